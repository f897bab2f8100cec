use rand::SeedableRng;
use rand::rngs::StdRng;

use dyncon::{ConnGraph, DynamicConnectivity, NaiveConnGraph};
use dyncon::generate::{Query, generate_queries, generate_vertices};

/// Bounded-perturbation trace: interleaved insertions, deletions and queries with fixed seeds,
/// every query cross-validated against the naive oracle. Optimize runs periodically in the
/// middle to confirm it never changes an answer.
#[test]
fn test_bounded_perturbation_against_oracle() {
	for seed in [7u64, 1234, 987654] {
		let mut rng = StdRng::seed_from_u64( seed );
		let num_vertices = 120;
		let vs = generate_vertices( num_vertices, &mut rng );
		let mut g : ConnGraph = ConnGraph::new();
		let mut naive : NaiveConnGraph = NaiveConnGraph::new();

		let mut num_queries = 0;
		for ( step, query ) in generate_queries( num_vertices, 3000, &mut rng )
				.into_iter().enumerate() {
			match query {
				Query::InsertEdge( u, v ) => {
					assert_eq!(
						g.add_edge( &vs[u], &vs[v] ).unwrap(),
						naive.add_edge( &vs[u], &vs[v] ).unwrap(),
						"divergence inserting {u},{v} at step {step}"
					);
				}
				Query::DeleteEdge( u, v ) => {
					assert_eq!(
						g.remove_edge( &vs[u], &vs[v] ).unwrap(),
						naive.remove_edge( &vs[u], &vs[v] ).unwrap(),
						"divergence deleting {u},{v} at step {step}"
					);
				}
				Query::QueryConnected( u, v ) => {
					assert_eq!(
						g.is_connected( &vs[u], &vs[v] ),
						naive.is_connected( &vs[u], &vs[v] ),
						"divergence querying {u},{v} at step {step}"
					);
					num_queries += 1;
				}
			}
			if step % 500 == 250 {
				g.optimize();
			}
		}
		assert!( num_queries > 0 );
	}
}

/// Component sizes and folds agree with the oracle throughout a randomized trace.
#[test]
fn test_random_component_info_against_oracle() {
	let mut rng = StdRng::seed_from_u64( 31337 );
	let num_vertices = 40;
	let vs = generate_vertices( num_vertices, &mut rng );
	let mut g = ConnGraph::with_augmentation( |a : &i64, b : &i64| a + b );
	let mut naive = NaiveConnGraph::with_augmentation( |a : &i64, b : &i64| a + b );

	for ( i, v ) in vs.iter().enumerate() {
		if i % 2 == 0 {
			g.set_vertex_augmentation( v, i as i64 ).unwrap();
			naive.set_vertex_augmentation( v, i as i64 ).unwrap();
		}
	}

	for query in generate_queries( num_vertices, 600, &mut rng ) {
		match query {
			Query::InsertEdge( u, v ) => {
				g.add_edge( &vs[u], &vs[v] ).unwrap();
				naive.add_edge( &vs[u], &vs[v] ).unwrap();
			}
			Query::DeleteEdge( u, v ) => {
				g.remove_edge( &vs[u], &vs[v] ).unwrap();
				naive.remove_edge( &vs[u], &vs[v] ).unwrap();
			}
			Query::QueryConnected( u, v ) => {
				let mine = g.get_component_info( &vs[u] );
				let expected = naive.get_component_info( &vs[u] );
				assert_eq!( mine.size, expected.size );
				assert_eq!( mine.augmentation, expected.augmentation );
				let _ = v;
			}
		}
	}
}

/// Adding and immediately removing an absent edge restores all observable answers.
#[test]
fn test_add_remove_is_inverse() {
	let mut rng = StdRng::seed_from_u64( 5150 );
	let num_vertices = 25;
	let vs = generate_vertices( num_vertices, &mut rng );
	let mut g : ConnGraph = ConnGraph::new();
	let mut naive : NaiveConnGraph = NaiveConnGraph::new();

	for query in generate_queries( num_vertices, 300, &mut rng ) {
		if let Query::InsertEdge( u, v ) | Query::DeleteEdge( u, v ) = query {
			g.add_edge( &vs[u], &vs[v] ).ok();
			naive.add_edge( &vs[u], &vs[v] ).ok();
		}
	}

	let snapshot : Vec<bool> = ( 0..num_vertices )
		.flat_map( |a| ( 0..num_vertices ).map( move |b| ( a, b ) ) )
		.map( |( a, b )| g.is_connected( &vs[a], &vs[b] ) )
		.collect();

	// Toggle a batch of absent edges on and off again.
	let mut toggled = Vec::new();
	for a in 0..num_vertices {
		let b = ( a + 7 ) % num_vertices;
		if a != b && g.add_edge( &vs[a], &vs[b] ).unwrap() {
			toggled.push( ( a, b ) );
		}
	}
	for ( a, b ) in toggled {
		assert!( g.remove_edge( &vs[a], &vs[b] ).unwrap() );
	}

	let restored : Vec<bool> = ( 0..num_vertices )
		.flat_map( |a| ( 0..num_vertices ).map( move |b| ( a, b ) ) )
		.map( |( a, b )| g.is_connected( &vs[a], &vs[b] ) )
		.collect();
	assert_eq!( snapshot, restored );

	for a in 0..num_vertices {
		for b in 0..num_vertices {
			assert_eq!( g.is_connected( &vs[a], &vs[b] ),
				naive.is_connected( &vs[a], &vs[b] ) );
		}
	}
}

/// After clear, only reflexive connectivity remains, and the graph is usable again.
#[test]
fn test_clear_forgets_everything() {
	let mut rng = StdRng::seed_from_u64( 404 );
	let num_vertices = 20;
	let vs = generate_vertices( num_vertices, &mut rng );
	let mut g : ConnGraph = ConnGraph::new();

	for query in generate_queries( num_vertices, 200, &mut rng ) {
		if let Query::InsertEdge( u, v ) = query {
			g.add_edge( &vs[u], &vs[v] ).unwrap();
		}
	}
	g.clear();

	for a in 0..num_vertices {
		for b in 0..num_vertices {
			assert_eq!( g.is_connected( &vs[a], &vs[b] ), a == b );
		}
	}

	assert!( g.add_edge( &vs[0], &vs[1] ).unwrap() );
	assert!( g.is_connected( &vs[0], &vs[1] ) );
}
