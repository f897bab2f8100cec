/*!
Fully-dynamic connectivity for undirected graphs, with component augmentation.

This crate maintains a graph under an interleaved sequence of edge insertions and deletions and
answers, at any time, whether two vertices lie in the same connected component. Insertions and
deletions take O(log² n) amortized time, connectivity and component queries O(log n), using the
layered Euler-tour-forest structure of Holm, de Lichtenberg and Thorup
([\[HLT01\]](https://doi.org/10.1145/502090.502095)).

Vertices are opaque [Vertex] handles, created by the caller and usable in any number of graphs at
once. A graph may additionally carry a user value per vertex (an *augmentation*) together with a
combining function; the fold of all values in a component is then available in O(log n) through
[ConnGraph::get_component_info].

# Examples

```
use dyncon::{ConnGraph, DynamicConnectivity, Vertex};

let mut g : ConnGraph = ConnGraph::new();
let u = Vertex::new();
let v = Vertex::new();
let w = Vertex::new();

// Build a path u - v - w
assert!( g.add_edge( &u, &v ).unwrap() );
assert!( g.add_edge( &v, &w ).unwrap() );
assert!( g.is_connected( &u, &w ) );

// Deleting the tree edge u - v disconnects u
assert!( g.remove_edge( &u, &v ).unwrap() );
assert!( !g.is_connected( &u, &w ) );
assert!( g.is_connected( &v, &w ) );
```

```
use dyncon::{ConnGraph, DynamicConnectivity, Vertex};

// A graph folding i64 values over each component
let mut g = ConnGraph::with_augmentation( |a : &i64, b : &i64| a + b );
let u = Vertex::new();
let v = Vertex::new();

g.set_vertex_augmentation( &u, 10 ).unwrap();
g.set_vertex_augmentation( &v, 32 ).unwrap();
g.add_edge( &u, &v ).unwrap();

let info = g.get_component_info( &u );
assert_eq!( info.size, 2 );
assert_eq!( info.augmentation, Some( 42 ) );
```

# Crate feature flags

The following crate feature flags are available. They are configured in your `Cargo.toml`.

* `space_efficient_nodes`
	* Optional, requires the `nonmax` crate.
	* Improve space usage of the internal arena indices. Disallows the maximum index and incurs
		a small runtime cost to check that this index is not used.
* `petgraph`
	* Optional, requires the `petgraph` crate.
	* Enable a petgraph-based connectivity oracle. This implementation is very slow and only
		intended to be used for comparison or verification.
* `generate`
	* Optional.
	* Enables functionality to randomly generate operation traces. Used for tests.
* `verify_hlt`
	* Optional. WARNING: very slow.
	* Verify the layered forest structure after every mutating operation.

# Literature

\[HLT01\] Jacob Holm, Kristian de Lichtenberg, and Mikkel Thorup. Poly-logarithmic deterministic
fully-dynamic algorithms for connectivity, minimum spanning tree, 2-edge, and biconnectivity.
Journal of the ACM, 48(4):723–760, 2001.
doi:[10.1145/502090.502095](https://doi.org/10.1145/502090.502095)

\[HK99\] Monika R. Henzinger and Valerie King. Randomized fully dynamic graph algorithms with
polylogarithmic time per operation. Journal of the ACM, 46(4):502–516, 1999.
doi:[10.1145/320211.320215](https://doi.org/10.1145/320211.320215)
*/

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::private_doc_tests)]

use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rand::Rng;

mod arena;
mod euler;
mod forest;
mod rbtree;

pub mod common;
pub mod graph;
pub mod naive;

#[cfg( feature = "generate" )]
pub mod generate;

#[cfg( feature = "petgraph" )]
pub mod pg;

pub use graph::{ComponentInfo, ConnGraph, MAX_VERTICES};
pub use naive::NaiveConnGraph;


struct VertexCore {
	fingerprint : u32
}

/// An opaque vertex handle.
///
/// A vertex is pure identity: two handles are equal exactly when one was cloned from the other.
/// The hash is a random 32-bit fingerprint drawn at creation, which keeps hash chains short with
/// high probability regardless of how the handles are used. A handle belongs to no particular
/// graph and may appear in many graphs at once.
#[derive(Clone)]
pub struct Vertex {
	core : Rc<VertexCore>
}

impl Vertex {
	/// Creates a fresh vertex with a fingerprint from the thread-local generator.
	pub fn new() -> Vertex {
		Self::with_rng( &mut rand::thread_rng() )
	}

	/// Creates a fresh vertex with a fingerprint from the given generator.
	///
	/// Useful for reproducible tests; note that equality is still identity, so two vertices
	/// with equal fingerprints remain distinct.
	pub fn with_rng( rng : &mut impl Rng ) -> Vertex {
		Vertex { core : Rc::new( VertexCore { fingerprint : rng.gen() } ) }
	}

	/// The random fingerprint backing this vertex's hash.
	pub fn fingerprint( &self ) -> u32 {
		self.core.fingerprint
	}
}

impl Default for Vertex {
	fn default() -> Vertex {
		Vertex::new()
	}
}

impl PartialEq for Vertex {
	fn eq( &self, other : &Self ) -> bool {
		Rc::ptr_eq( &self.core, &other.core )
	}
}

impl Eq for Vertex {}

impl Hash for Vertex {
	fn hash<H : Hasher>( &self, state : &mut H ) {
		state.write_u32( self.core.fingerprint );
	}
}

impl Debug for Vertex {
	fn fmt( &self, f : &mut Formatter<'_> ) -> std::fmt::Result {
		write!( f, "Vertex({:08x})", self.core.fingerprint )
	}
}

impl Display for Vertex {
	fn fmt( &self, f : &mut Formatter<'_> ) -> std::fmt::Result {
		write!( f, "v{:08x}", self.core.fingerprint )
	}
}


/// Errors reported by graph operations.
///
/// Every mutating operation checks its arguments before touching any structure, so a returned
/// error implies the graph is unchanged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
	/// The two endpoints of an edge were the same vertex.
	SelfLoop,

	/// The operation would have exceeded the maximum number of simultaneous vertices.
	TooManyVertices,

	/// An augmentation method was called on a graph constructed without a combining function.
	AugmentationDisabled,

	/// A component-enumeration method was called on a graph without the component registry.
	RegistryDisabled
}

impl Display for Error {
	fn fmt( &self, f : &mut Formatter<'_> ) -> std::fmt::Result {
		match self {
			Error::SelfLoop => write!( f, "self-loops are not supported" ),
			Error::TooManyVertices =>
				write!( f, "the graph cannot hold more than {} vertices", graph::MAX_VERTICES ),
			Error::AugmentationDisabled =>
				write!( f, "this graph was constructed without vertex augmentation" ),
			Error::RegistryDisabled =>
				write!( f, "this graph was constructed without the component registry" )
		}
	}
}

impl std::error::Error for Error {}


/// A dynamic undirected graph that answers connectivity queries.
///
/// This is the seam between the real engine ([ConnGraph]) and the slow reference
/// implementations used to verify it ([NaiveConnGraph], and the petgraph-backed oracle with the
/// `petgraph` feature).
#[portrait::make]
pub trait DynamicConnectivity {
	/// Adds the undirected edge `(u, v)`.
	///
	/// Returns true if the edge was not present. Adding a present edge is a no-op returning
	/// false.
	fn add_edge( &mut self, u : &Vertex, v : &Vertex ) -> Result<bool, Error>;

	/// Removes the undirected edge `(u, v)`.
	///
	/// Returns true if the edge was present. Removing an absent edge is a no-op returning
	/// false.
	fn remove_edge( &mut self, u : &Vertex, v : &Vertex ) -> Result<bool, Error>;

	/// Indicates whether some path connects `u` and `v`. Reflexive: every vertex is connected
	/// to itself, known to the graph or not.
	fn is_connected( &self, u : &Vertex, v : &Vertex ) -> bool;

	/// The direct neighbours of `u`; empty if `u` is unknown to the graph.
	fn adjacent_vertices( &self, u : &Vertex ) -> Vec<Vertex>;

	/// Removes all edges and augmentations.
	fn clear( &mut self );
}
