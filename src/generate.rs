//! Various helpers to randomly generate operation traces.

use std::collections::HashSet;

use rand::Rng;

use crate::Vertex;

/// Generate `n` fresh vertices with fingerprints from the given generator.
pub fn generate_vertices( n : usize, rng : &mut impl Rng ) -> Vec<Vertex> {
	( 0..n ).map( |_| Vertex::with_rng( rng ) ).collect()
}


/// Generate a uniformly random edge `(u,v)`, where `u` and `v` are distinct and in `0..num_vertices`.
pub fn generate_edge( num_vertices : usize, rng : &mut impl Rng ) -> (usize, usize) {
	let u = rng.gen_range( 0..num_vertices );
	let mut v = rng.gen_range( 0..num_vertices-1 );
	if v >= u {
		v += 1;
	}
	( u, v )
}


/// One operation of a generated trace, over vertex indices.
#[derive(Copy, Clone, Debug)]
pub enum Query {
	/// Add the edge between the two vertices.
	InsertEdge( usize, usize ),

	/// Remove the edge between the two vertices.
	DeleteEdge( usize, usize ),

	/// Ask whether the two vertices are connected.
	QueryConnected( usize, usize )
}

/// Generate a trace of `num_queries` interleaved insertions, deletions and connectivity
/// queries. Insertion or deletion is chosen by whether the edge is currently present, so the
/// trace is always applicable to a graph that starts empty.
pub fn generate_queries( num_vertices : usize, num_queries : usize, rng : &mut impl Rng )
	-> Vec<Query>
{
	let mut cur_edges : HashSet<(usize, usize)> = HashSet::new();
	( 0..num_queries ).map( |_| {
		let ( u, v ) = generate_edge( num_vertices, rng );
		let key = ( u.min( v ), u.max( v ) );
		if rng.gen_ratio( 1, 4 ) {
			Query::QueryConnected( u, v )
		}
		else if cur_edges.remove( &key ) {
			Query::DeleteEdge( u, v )
		}
		else {
			cur_edges.insert( key );
			Query::InsertEdge( u, v )
		}
	} ).collect()
}
