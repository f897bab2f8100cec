use dyncon::{ConnGraph, DynamicConnectivity, NaiveConnGraph, Vertex};

use crate::util::DynamicTestGraph;

/// The same small scenario for every implementation behind the trait.
fn test_for<TGraph : DynamicConnectivity + Default>() {
	let mut g = TGraph::default();
	let vs : Vec<Vertex> = ( 0..5 ).map( |_| Vertex::new() ).collect();
	g.add_edge( &vs[0], &vs[1] ).unwrap();
	g.add_edge( &vs[2], &vs[4] ).unwrap();
	g.add_edge( &vs[3], &vs[1] ).unwrap();
	g.add_edge( &vs[3], &vs[2] ).unwrap();
	assert!( g.is_connected( &vs[0], &vs[4] ) );
	g.remove_edge( &vs[3], &vs[2] ).unwrap();
	assert!( !g.is_connected( &vs[0], &vs[4] ) );
	g.remove_edge( &vs[3], &vs[1] ).unwrap();
	g.add_edge( &vs[2], &vs[1] ).unwrap();
	assert!( g.is_connected( &vs[0], &vs[4] ) );
}

#[test]
fn test_implementations_agree() {
	test_for::<ConnGraph>();
	test_for::<NaiveConnGraph>();
}

#[test]
fn test_small_forest_with_attachment() {
	// Vertices 1..=7; index 0 stays unused for readable labels.
	let mut t = DynamicTestGraph::new( 8 );
	t.add_edge( 1, 2 );
	t.add_edge( 3, 1 );
	t.add_edge( 1, 4 );
	t.add_edge( 6, 7 );
	t.add_edge( 6, 5 );
	t.add_edge( 4, 5 );

	// The reversed duplicate is recognized
	assert!( !t.add_edge( 1, 3 ) );

	t.assert_connected( 1, 7 );
	t.check_all_pairs();

	t.remove_edge( 4, 5 );
	t.assert_disconnected( 1, 5 );
	t.assert_connected( 5, 6 );
	t.check_all_pairs();
	t.check_component_sizes();
}

#[test]
fn test_five_cycle_with_chord() {
	let mut t = DynamicTestGraph::new( 6 );
	t.add_edge( 1, 2 );
	t.add_edge( 2, 3 );
	t.add_edge( 1, 3 );
	t.add_edge( 2, 4 );
	t.add_edge( 3, 4 );
	t.add_edge( 4, 5 );

	t.assert_connected( 5, 1 );

	t.remove_edge( 4, 5 );
	t.assert_disconnected( 5, 1 );
	t.assert_connected( 1, 4 );

	t.remove_edge( 1, 2 );
	t.remove_edge( 3, 4 );
	t.remove_edge( 2, 3 );
	t.assert_connected( 1, 3 );
	t.assert_connected( 2, 4 );
	t.assert_disconnected( 1, 4 );
	t.check_all_pairs();
}

const GRID : usize = 20;

fn cell( row : usize, col : usize ) -> usize {
	row * GRID + col
}

#[test]
fn test_grid_cuts() {
	let mut t = DynamicTestGraph::new( GRID * GRID );
	for row in 0..GRID {
		for col in 0..GRID {
			if col + 1 < GRID {
				t.add_edge( cell( row, col ), cell( row, col + 1 ) );
			}
			if row + 1 < GRID {
				t.add_edge( cell( row, col ), cell( row + 1, col ) );
			}
		}
	}
	t.assert_connected( cell( 0, 0 ), cell( GRID - 1, GRID - 1 ) );

	// Cut seven of the eight boundary edges of the L-shaped block (12,8), (13,8), (13,9).
	t.remove_edge( cell( 12, 8 ), cell( 11, 8 ) );
	t.remove_edge( cell( 12, 8 ), cell( 12, 7 ) );
	t.remove_edge( cell( 12, 8 ), cell( 12, 9 ) );
	t.remove_edge( cell( 13, 8 ), cell( 13, 7 ) );
	t.remove_edge( cell( 13, 8 ), cell( 14, 8 ) );
	t.remove_edge( cell( 13, 9 ), cell( 12, 9 ) );
	t.remove_edge( cell( 13, 9 ), cell( 14, 9 ) );
	t.assert_connected( cell( 2, 1 ), cell( 12, 8 ) );

	// The eighth cut separates the block, (13,9) included.
	t.remove_edge( cell( 13, 9 ), cell( 13, 10 ) );
	t.assert_disconnected( cell( 2, 1 ), cell( 12, 8 ) );
	t.assert_connected( cell( 12, 8 ), cell( 13, 9 ) );

	// Two interior cuts strand the two corner cells separately.
	t.remove_edge( cell( 12, 8 ), cell( 13, 8 ) );
	t.remove_edge( cell( 13, 8 ), cell( 13, 9 ) );
	t.assert_disconnected( cell( 12, 8 ), cell( 13, 9 ) );
	t.check_component_sizes();
}

/// The dodecahedral graph: outer pentagon 0..5, middle 10-ring 5..15, inner pentagon 15..20.
/// Outer vertices attach to the even ring positions, inner ones to the odd. Every vertex has
/// degree three; 30 edges in total.
fn dodecahedron_edges() -> Vec<(usize, usize)> {
	let mut edges = Vec::new();
	for i in 0..5 {
		edges.push( ( i, ( i + 1 ) % 5 ) ); // Outer pentagon
		edges.push( ( 15 + i, 15 + ( i + 1 ) % 5 ) ); // Inner pentagon
		edges.push( ( i, 5 + 2 * i ) ); // Outer spoke
		edges.push( ( 15 + i, 5 + 2 * i + 1 ) ); // Inner spoke
	}
	for i in 0..10 {
		edges.push( ( 5 + i, 5 + ( i + 1 ) % 10 ) ); // Middle ring
	}
	edges
}

#[test]
fn test_dodecahedron() {
	let mut t = DynamicTestGraph::new( 20 );
	let edges = dodecahedron_edges();
	assert_eq!( edges.len(), 30 );
	for &( u, v ) in &edges {
		t.add_edge( u, v );
	}
	t.check_all_pairs();
	for u in 0..20 {
		t.assert_connected( 0, u );
	}

	// Five cuts leave everything connected: four inner spokes and one inner pentagon edge.
	t.remove_edge( 15, 6 );
	t.remove_edge( 16, 8 );
	t.remove_edge( 17, 10 );
	t.remove_edge( 18, 12 );
	t.remove_edge( 19, 15 );
	t.check_all_pairs();
	t.assert_connected( 0, 17 );

	// The sixth cut severs the last inner spoke and splits off the inner pentagon path.
	t.remove_edge( 19, 14 );
	t.assert_disconnected( 0, 17 );
	for u in 15..20 {
		t.assert_connected( 15, u );
	}
	for u in 0..15 {
		t.assert_connected( 0, u );
		t.assert_disconnected( u, 19 );
	}
	t.check_all_pairs();
	t.check_component_sizes();
}
