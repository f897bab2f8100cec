//! A naive reference implementation, used as the oracle in randomized tests.
//!
//! Adjacency sets plus breadth-first search; every operation is O(V + E). The component fold
//! visits each vertex once, in search order, and folds the *visited* vertex's augmentation.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{DynamicConnectivity, Error, Vertex};
use crate::graph::ComponentInfo;

/// The same dynamic-connectivity surface as [crate::ConnGraph], answered by breadth-first
/// search. Deliberately boring.
pub struct NaiveConnGraph<TAug = ()> {
	adjacency : HashMap<Vertex, HashSet<Vertex>>,
	augs : HashMap<Vertex, TAug>,
	combine : Option<Box<dyn Fn( &TAug, &TAug ) -> TAug>>
}

impl<TAug : Clone> NaiveConnGraph<TAug> {
	/// An empty graph without augmentation support.
	pub fn new() -> Self {
		NaiveConnGraph { adjacency : HashMap::new(), augs : HashMap::new(), combine : None }
	}

	/// An empty graph folding augmentations with the given function.
	pub fn with_augmentation( combine : impl Fn( &TAug, &TAug ) -> TAug + 'static ) -> Self {
		NaiveConnGraph {
			adjacency : HashMap::new(),
			augs : HashMap::new(),
			combine : Some( Box::new( combine ) )
		}
	}

	/// All vertices of `u`'s component, in search order. Contains `u` itself even when the
	/// vertex is unknown.
	fn component_of( &self, u : &Vertex ) -> Vec<Vertex> {
		let mut order = vec![u.clone()];
		let mut seen : HashSet<Vertex> = HashSet::from( [u.clone()] );
		let mut queue = VecDeque::from( [u.clone()] );
		while let Some( x ) = queue.pop_front() {
			let Some( neighbours ) = self.adjacency.get( &x ) else { continue };
			for y in neighbours {
				if seen.insert( y.clone() ) {
					order.push( y.clone() );
					queue.push_back( y.clone() );
				}
			}
		}
		order
	}

	/// Stores the augmentation of `u` and returns the previous value.
	pub fn set_vertex_augmentation( &mut self, u : &Vertex, aug : TAug )
		-> Result<Option<TAug>, Error>
	{
		if self.combine.is_none() {
			return Err( Error::AugmentationDisabled );
		}
		Ok( self.augs.insert( u.clone(), aug ) )
	}

	/// Removes the augmentation of `u` and returns the previous value.
	pub fn remove_vertex_augmentation( &mut self, u : &Vertex ) -> Result<Option<TAug>, Error> {
		if self.combine.is_none() {
			return Err( Error::AugmentationDisabled );
		}
		Ok( self.augs.remove( u ) )
	}

	/// The augmentation currently stored at `u`.
	pub fn get_vertex_augmentation( &self, u : &Vertex ) -> Result<Option<TAug>, Error> {
		if self.combine.is_none() {
			return Err( Error::AugmentationDisabled );
		}
		Ok( self.augs.get( u ).cloned() )
	}

	/// Indicates whether `u` currently stores an augmentation.
	pub fn vertex_has_augmentation( &self, u : &Vertex ) -> Result<bool, Error> {
		if self.combine.is_none() {
			return Err( Error::AugmentationDisabled );
		}
		Ok( self.augs.contains_key( u ) )
	}

	/// Indicates whether any vertex of `u`'s component stores an augmentation.
	pub fn component_has_augmentation( &self, u : &Vertex ) -> bool {
		self.component_of( u ).iter().any( |x| self.augs.contains_key( x ) )
	}

	/// Size, fold and a representative of `u`'s component, by a full traversal.
	pub fn get_component_info( &self, u : &Vertex ) -> ComponentInfo<TAug> {
		let members = self.component_of( u );
		let mut augmentation : Option<TAug> = None;
		if let Some( combine ) = &self.combine {
			for member in &members {
				let Some( value ) = self.augs.get( member ) else { continue };
				augmentation = match augmentation {
					None => Some( value.clone() ),
					Some( acc ) => Some( combine( &acc, value ) )
				};
			}
		}
		ComponentInfo { vertex : u.clone(), augmentation, size : members.len() }
	}
}

impl<TAug : Clone> Default for NaiveConnGraph<TAug> {
	fn default() -> Self {
		NaiveConnGraph::new()
	}
}

impl<TAug : Clone> DynamicConnectivity for NaiveConnGraph<TAug> {
	fn add_edge( &mut self, u : &Vertex, v : &Vertex ) -> Result<bool, Error> {
		if u == v {
			return Err( Error::SelfLoop );
		}
		let added = self.adjacency.entry( u.clone() ).or_default().insert( v.clone() );
		self.adjacency.entry( v.clone() ).or_default().insert( u.clone() );
		Ok( added )
	}

	fn remove_edge( &mut self, u : &Vertex, v : &Vertex ) -> Result<bool, Error> {
		if u == v {
			return Err( Error::SelfLoop );
		}
		let Some( neighbours ) = self.adjacency.get_mut( u ) else { return Ok( false ) };
		if !neighbours.remove( v ) {
			return Ok( false );
		}
		if neighbours.is_empty() {
			self.adjacency.remove( u );
		}
		let back = self.adjacency.get_mut( v ).unwrap();
		back.remove( u );
		if back.is_empty() {
			self.adjacency.remove( v );
		}
		Ok( true )
	}

	fn is_connected( &self, u : &Vertex, v : &Vertex ) -> bool {
		u == v || self.component_of( u ).contains( v )
	}

	fn adjacent_vertices( &self, u : &Vertex ) -> Vec<Vertex> {
		self.adjacency.get( u )
			.map( |neighbours| neighbours.iter().cloned().collect() )
			.unwrap_or_default()
	}

	fn clear( &mut self ) {
		self.adjacency.clear();
		self.augs.clear();
	}
}
