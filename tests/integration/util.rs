use std::collections::HashSet;

use petgraph::unionfind::UnionFind;

use dyncon::{ConnGraph, DynamicConnectivity, NaiveConnGraph, Vertex};

/// Runs the engine next to the naive oracle and checks that every answer agrees; full sweeps
/// additionally rebuild a union-find over the live edge set as a second, independent oracle.
pub struct DynamicTestGraph {
	pub g : ConnGraph<i64>,
	pub naive : NaiveConnGraph<i64>,
	pub vs : Vec<Vertex>,
	edges : HashSet<(usize, usize)>
}

impl DynamicTestGraph {
	#[allow(dead_code)]
	pub fn new( num_vertices : usize ) -> Self {
		DynamicTestGraph {
			g : ConnGraph::new(),
			naive : NaiveConnGraph::new(),
			vs : ( 0..num_vertices ).map( |_| Vertex::new() ).collect(),
			edges : HashSet::new()
		}
	}

	fn key( u : usize, v : usize ) -> (usize, usize) {
		( u.min( v ), u.max( v ) )
	}

	#[allow(dead_code)]
	pub fn add_edge( &mut self, u : usize, v : usize ) -> bool {
		let added = self.g.add_edge( &self.vs[u], &self.vs[v] ).unwrap();
		let naive_added = self.naive.add_edge( &self.vs[u], &self.vs[v] ).unwrap();
		assert_eq!( added, naive_added, "divergence adding edge {u},{v}" );
		if added {
			self.edges.insert( Self::key( u, v ) );
		}
		added
	}

	#[allow(dead_code)]
	pub fn remove_edge( &mut self, u : usize, v : usize ) -> bool {
		let removed = self.g.remove_edge( &self.vs[u], &self.vs[v] ).unwrap();
		let naive_removed = self.naive.remove_edge( &self.vs[u], &self.vs[v] ).unwrap();
		assert_eq!( removed, naive_removed, "divergence removing edge {u},{v}" );
		if removed {
			self.edges.remove( &Self::key( u, v ) );
		}
		removed
	}

	#[allow(dead_code)]
	pub fn check_connected( &self, u : usize, v : usize ) -> bool {
		let answer = self.g.is_connected( &self.vs[u], &self.vs[v] );
		assert_eq!( answer, self.naive.is_connected( &self.vs[u], &self.vs[v] ),
			"connectivity of {u}, {v} diverged from the naive oracle" );
		answer
	}

	#[allow(dead_code)]
	pub fn assert_connected( &self, u : usize, v : usize ) {
		assert!( self.check_connected( u, v ), "expected {u} and {v} to be connected" );
	}

	#[allow(dead_code)]
	pub fn assert_disconnected( &self, u : usize, v : usize ) {
		assert!( !self.check_connected( u, v ), "expected {u} and {v} to be disconnected" );
	}

	/// Cross-validates every pair against a union-find rebuilt from the live edge set.
	#[allow(dead_code)]
	pub fn check_all_pairs( &self ) {
		let mut dsu : UnionFind<usize> = UnionFind::new( self.vs.len() );
		for &( u, v ) in &self.edges {
			dsu.union( u, v );
		}
		for u in 0..self.vs.len() {
			for v in u..self.vs.len() {
				assert_eq!( self.g.is_connected( &self.vs[u], &self.vs[v] ),
					dsu.equiv( u, v ),
					"connectivity of {u}, {v} diverged from the union-find oracle" );
			}
		}
	}

	/// Checks that component sizes agree with the naive oracle for every vertex.
	#[allow(dead_code)]
	pub fn check_component_sizes( &self ) {
		for u in 0..self.vs.len() {
			assert_eq!(
				self.g.get_component_info( &self.vs[u] ).size,
				self.naive.get_component_info( &self.vs[u] ).size,
				"component size of {u} diverged"
			);
		}
	}
}
