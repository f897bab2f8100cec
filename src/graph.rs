//! The public graph façade: vertex bookkeeping on top of the layered forest.
//!
//! The façade owns the mapping from external [Vertex] handles to their top-level forest
//! representatives and per-vertex neighbour maps. All structural work is delegated to the
//! internal engine; this layer contributes argument checking, the all-or-nothing error
//! semantics, the optional component registry and the capacity hygiene of the hash maps.

use std::collections::HashMap;

use crate::{DynamicConnectivity, Error, Vertex};
use crate::arena::{EdgeIdx, EulerVertIdx, NodeIdx};
use crate::forest::HltForest;

/// Hard limit on simultaneous vertices per graph.
pub const MAX_VERTICES : usize = 1 << 30;

/// Backing capacity is released once a map has this much slack...
const SHRINK_FACTOR : usize = 4;

/// ...unless it is small anyway.
const SHRINK_MIN_CAPACITY : usize = 16;

fn maybe_shrink<K : Eq + std::hash::Hash, V>( map : &mut HashMap<K, V> ) {
	if map.capacity() > SHRINK_MIN_CAPACITY && map.len() * SHRINK_FACTOR <= map.capacity() {
		map.shrink_to( map.len() * 2 );
	}
}


/// Per-graph record for an externally known vertex.
struct VertexInfo {
	/// The top-level forest representative.
	etv : EulerVertIdx,

	/// Neighbour vertex to the edge record between them.
	edges : HashMap<Vertex, EdgeIdx>
}

/// Summary of one connected component.
#[derive(Clone, Debug)]
pub struct ComponentInfo<TAug> {
	/// Some vertex of the component.
	pub vertex : Vertex,

	/// Fold of the vertex augmentations over the component, if any are set.
	pub augmentation : Option<TAug>,

	/// Number of vertices in the component.
	pub size : usize
}


/// A fully-dynamic undirected graph answering connectivity and component queries.
///
/// Poly-logarithmic: edge insertion and deletion are O(log² n) amortized, connectivity and
/// component queries O(log n). See the crate documentation for examples.
///
/// The type parameter is the per-vertex augmentation value; graphs built with
/// [ConnGraph::new] never touch it and can leave it defaulted.
pub struct ConnGraph<TAug = ()> {
	forest : HltForest<TAug>,
	verts : HashMap<Vertex, VertexInfo>,
	registry : Option<HashMap<NodeIdx, Vertex>>
}

impl<TAug : Clone> ConnGraph<TAug> {
	/// Creates an empty graph without vertex augmentation. Augmentation methods on it report
	/// [Error::AugmentationDisabled].
	pub fn new() -> Self {
		ConnGraph { forest : HltForest::new( None ), verts : HashMap::new(), registry : None }
	}

	/// Creates an empty graph folding vertex augmentations with the given function.
	///
	/// The function is treated as associative and applied in component order; commutativity is
	/// not assumed.
	pub fn with_augmentation( combine : impl Fn( &TAug, &TAug ) -> TAug + 'static ) -> Self {
		ConnGraph {
			forest : HltForest::new( Some( Box::new( combine ) ) ),
			verts : HashMap::new(),
			registry : None
		}
	}

	/// Enables the component registry, which makes [Self::number_of_components] and
	/// [Self::all_components] available at O(1) bookkeeping cost per operation.
	pub fn with_component_registry( mut self ) -> Self {
		let mut registry = HashMap::new();
		for ( vertex, info ) in &self.verts {
			registry.entry( self.forest.tree_root_ref( info.etv ) )
				.or_insert_with( || vertex.clone() );
		}
		self.registry = Some( registry );
		self
	}

	fn verify( &mut self ) {
		#[cfg( feature = "verify_hlt" )]
		self.forest.check_invariants();
	}

	/// Looks up or creates the top-level representative. The caller has already checked the
	/// vertex limit.
	fn ensure_vertex( &mut self, v : &Vertex ) -> EulerVertIdx {
		if let Some( info ) = self.verts.get( v ) {
			return info.etv;
		}
		let etv = self.forest.create_vertex();
		self.verts.insert( v.clone(), VertexInfo { etv, edges : HashMap::new() } );
		if let Some( registry ) = &mut self.registry {
			registry.insert( self.forest.tree_root_ref( etv ), v.clone() );
		}
		etv
	}

	/// Drops a vertex that no longer carries edges or an augmentation.
	fn maybe_drop_vertex( &mut self, v : &Vertex ) {
		let Some( info ) = self.verts.get( v ) else { return };
		if !info.edges.is_empty() || self.forest.vertex_aug( info.etv ).is_some() {
			return;
		}
		let etv = info.etv;
		if let Some( registry ) = &mut self.registry {
			registry.remove( &self.forest.tree_root_ref( etv ) );
		}
		self.verts.remove( v );
		self.forest.delete_vertex( etv );
		maybe_shrink( &mut self.verts );
	}

	/// Size, fold and a representative of `u`'s component. An unknown vertex is its own
	/// component of size one.
	pub fn get_component_info( &self, u : &Vertex ) -> ComponentInfo<TAug> {
		match self.verts.get( u ) {
			None => ComponentInfo { vertex : u.clone(), augmentation : None, size : 1 },
			Some( info ) => {
				let root = self.forest.tree_root_ref( info.etv );
				ComponentInfo {
					vertex : u.clone(),
					augmentation : self.forest.component_aug_of_root( root ),
					size : self.forest.component_size_of_root( root )
				}
			}
		}
	}

	/// Stores the augmentation of `u`, creating the vertex if needed. Returns the previous
	/// value, or `None` if none was set.
	pub fn set_vertex_augmentation( &mut self, u : &Vertex, aug : TAug )
		-> Result<Option<TAug>, Error>
	{
		if !self.forest.has_combine() {
			return Err( Error::AugmentationDisabled );
		}
		if !self.verts.contains_key( u ) && self.verts.len() + 1 > MAX_VERTICES {
			return Err( Error::TooManyVertices );
		}
		let etv = self.ensure_vertex( u );
		let old = self.forest.set_vertex_aug( etv, Some( aug ) );
		self.verify();
		Ok( old )
	}

	/// Removes the augmentation of `u` and returns the previous value. The vertex is dropped
	/// if this leaves it without edges.
	pub fn remove_vertex_augmentation( &mut self, u : &Vertex ) -> Result<Option<TAug>, Error> {
		if !self.forest.has_combine() {
			return Err( Error::AugmentationDisabled );
		}
		let Some( info ) = self.verts.get( u ) else { return Ok( None ) };
		let etv = info.etv;
		let old = self.forest.set_vertex_aug( etv, None );
		self.maybe_drop_vertex( u );
		self.verify();
		Ok( old )
	}

	/// The augmentation currently stored at `u`.
	pub fn get_vertex_augmentation( &self, u : &Vertex ) -> Result<Option<TAug>, Error> {
		if !self.forest.has_combine() {
			return Err( Error::AugmentationDisabled );
		}
		Ok( self.verts.get( u ).and_then( |info| self.forest.vertex_aug( info.etv ).cloned() ) )
	}

	/// Indicates whether `u` currently stores an augmentation.
	pub fn vertex_has_augmentation( &self, u : &Vertex ) -> Result<bool, Error> {
		if !self.forest.has_combine() {
			return Err( Error::AugmentationDisabled );
		}
		Ok( self.verts.get( u ).map_or( false, |info| self.forest.vertex_aug( info.etv ).is_some() ) )
	}

	/// Indicates whether any vertex of `u`'s component stores an augmentation.
	pub fn component_has_augmentation( &self, u : &Vertex ) -> bool {
		self.verts.get( u ).map_or( false, |info| {
			let root = self.forest.tree_root_ref( info.etv );
			self.forest.component_aug_of_root( root ).is_some()
		} )
	}

	/// The number of connected components among the known vertices. Requires the component
	/// registry.
	pub fn number_of_components( &self ) -> Result<usize, Error> {
		match &self.registry {
			Some( registry ) => Ok( registry.len() ),
			None => Err( Error::RegistryDisabled )
		}
	}

	/// One [ComponentInfo] per connected component. Requires the component registry.
	pub fn all_components( &self ) -> Result<Vec<ComponentInfo<TAug>>, Error> {
		let Some( registry ) = &self.registry else { return Err( Error::RegistryDisabled ) };
		Ok( registry.iter()
			.map( |( &root, vertex )| ComponentInfo {
				vertex : vertex.clone(),
				augmentation : self.forest.component_aug_of_root( root ),
				size : self.forest.component_size_of_root( root )
			} )
			.collect() )
	}

	/// Losslessly reorganizes the internal structure; observable answers are unaffected.
	/// Sinking edges to their deepest admissible levels makes future deletions cheaper.
	pub fn optimize( &mut self ) {
		self.forest.optimize();
		self.verify();
	}

	/// Number of known vertices (those with at least one edge or an augmentation).
	pub fn number_of_vertices( &self ) -> usize {
		self.verts.len()
	}
}

impl<TAug : Clone> Default for ConnGraph<TAug> {
	fn default() -> Self {
		ConnGraph::new()
	}
}

impl<TAug : Clone> DynamicConnectivity for ConnGraph<TAug> {
	fn add_edge( &mut self, u : &Vertex, v : &Vertex ) -> Result<bool, Error> {
		if u == v {
			return Err( Error::SelfLoop );
		}
		if let Some( info ) = self.verts.get( u ) {
			if info.edges.contains_key( v ) {
				return Ok( false );
			}
		}
		let additions = !self.verts.contains_key( u ) as usize
			+ !self.verts.contains_key( v ) as usize;
		if self.verts.len() + additions > MAX_VERTICES {
			return Err( Error::TooManyVertices );
		}

		let ue = self.ensure_vertex( u );
		let ve = self.ensure_vertex( v );
		let pre_roots = self.registry.is_some()
			.then( || ( self.forest.tree_root_ref( ue ), self.forest.tree_root_ref( ve ) ) );

		let e = self.forest.add_edge( ue, ve );
		self.verts.get_mut( u ).unwrap().edges.insert( v.clone(), e );
		self.verts.get_mut( v ).unwrap().edges.insert( u.clone(), e );

		if let Some( ( ru, rv ) ) = pre_roots {
			let root = self.forest.tree_root_ref( ue );
			let registry = self.registry.as_mut().unwrap();
			registry.remove( &ru );
			registry.remove( &rv );
			registry.insert( root, u.clone() );
		}
		self.verify();
		Ok( true )
	}

	fn remove_edge( &mut self, u : &Vertex, v : &Vertex ) -> Result<bool, Error> {
		if u == v {
			return Err( Error::SelfLoop );
		}
		let Some( info ) = self.verts.get( u ) else { return Ok( false ) };
		let Some( &e ) = info.edges.get( v ) else { return Ok( false ) };
		let ue = info.etv;
		let ve = self.verts.get( v ).unwrap().etv;
		let pre_root = self.registry.is_some().then( || self.forest.tree_root_ref( ue ) );

		self.forest.remove_edge( e );
		{
			let u_edges = &mut self.verts.get_mut( u ).unwrap().edges;
			u_edges.remove( v );
			maybe_shrink( u_edges );
		}
		{
			let v_edges = &mut self.verts.get_mut( v ).unwrap().edges;
			v_edges.remove( u );
			maybe_shrink( v_edges );
		}

		if let Some( old_root ) = pre_root {
			let r1 = self.forest.tree_root_ref( ue );
			let r2 = self.forest.tree_root_ref( ve );
			let registry = self.registry.as_mut().unwrap();
			registry.remove( &old_root );
			registry.insert( r1, u.clone() );
			registry.insert( r2, v.clone() );
		}

		self.maybe_drop_vertex( u );
		self.maybe_drop_vertex( v );
		self.verify();
		Ok( true )
	}

	fn is_connected( &self, u : &Vertex, v : &Vertex ) -> bool {
		if u == v {
			return true;
		}
		let ( Some( iu ), Some( iv ) ) = ( self.verts.get( u ), self.verts.get( v ) ) else {
			return false;
		};
		self.forest.connected( iu.etv, iv.etv )
	}

	fn adjacent_vertices( &self, u : &Vertex ) -> Vec<Vertex> {
		self.verts.get( u )
			.map( |info| info.edges.keys().cloned().collect() )
			.unwrap_or_default()
	}

	fn clear( &mut self ) {
		self.forest.clear();
		self.verts = HashMap::new();
		if let Some( registry ) = &mut self.registry {
			*registry = HashMap::new();
		}
	}
}
