//! Connectivity oracle based on the petgraph library.
//!
//! This implementation is very slow and only intended to be used for comparison or
//! verification.

use std::collections::HashMap;

use petgraph::algo;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};

use crate::{DynamicConnectivity, Error, Vertex};


/// A straight-forward implementation of dynamic connectivity using the petgraph library.
pub struct PetgraphConnGraph {
	g : StableUnGraph<Vertex, ()>,
	nodes : HashMap<Vertex, NodeIndex>
}

impl PetgraphConnGraph {
	/// Creates an empty graph.
	pub fn new() -> Self {
		PetgraphConnGraph { g : StableUnGraph::default(), nodes : HashMap::new() }
	}

	fn ensure_node( &mut self, v : &Vertex ) -> NodeIndex {
		if let Some( &idx ) = self.nodes.get( v ) {
			return idx;
		}
		let idx = self.g.add_node( v.clone() );
		self.nodes.insert( v.clone(), idx );
		idx
	}

	fn drop_if_isolated( &mut self, v : &Vertex ) {
		if let Some( &idx ) = self.nodes.get( v ) {
			if self.g.neighbors( idx ).next().is_none() {
				self.g.remove_node( idx );
				self.nodes.remove( v );
			}
		}
	}
}

impl Default for PetgraphConnGraph {
	fn default() -> Self {
		PetgraphConnGraph::new()
	}
}

impl DynamicConnectivity for PetgraphConnGraph {
	fn add_edge( &mut self, u : &Vertex, v : &Vertex ) -> Result<bool, Error> {
		if u == v {
			return Err( Error::SelfLoop );
		}
		let ui = self.ensure_node( u );
		let vi = self.ensure_node( v );
		if self.g.find_edge( ui, vi ).is_some() {
			return Ok( false );
		}
		self.g.add_edge( ui, vi, () );
		Ok( true )
	}

	fn remove_edge( &mut self, u : &Vertex, v : &Vertex ) -> Result<bool, Error> {
		if u == v {
			return Err( Error::SelfLoop );
		}
		let ( Some( &ui ), Some( &vi ) ) = ( self.nodes.get( u ), self.nodes.get( v ) ) else {
			return Ok( false );
		};
		let Some( e ) = self.g.find_edge( ui, vi ) else { return Ok( false ) };
		self.g.remove_edge( e );
		self.drop_if_isolated( u );
		self.drop_if_isolated( v );
		Ok( true )
	}

	fn is_connected( &self, u : &Vertex, v : &Vertex ) -> bool {
		if u == v {
			return true;
		}
		let ( Some( &ui ), Some( &vi ) ) = ( self.nodes.get( u ), self.nodes.get( v ) ) else {
			return false;
		};
		algo::has_path_connecting( &self.g, ui, vi, None )
	}

	fn adjacent_vertices( &self, u : &Vertex ) -> Vec<Vertex> {
		match self.nodes.get( u ) {
			Some( &ui ) => self.g.neighbors( ui ).map( |n| self.g[n].clone() ).collect(),
			None => Vec::new()
		}
	}

	fn clear( &mut self ) {
		self.g.clear();
		self.nodes.clear();
	}
}
