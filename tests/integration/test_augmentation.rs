use dyncon::{ConnGraph, DynamicConnectivity, NaiveConnGraph, Vertex};
use dyncon::common::{I64SumMaxAug, SumMaxAug};

struct HubAndSpokes {
	g : ConnGraph<I64SumMaxAug>,
	hub : Vertex,
	spokes1 : Vec<Vertex>,
	spokes2 : Vec<Vertex>,
	clique : Vec<Vertex>
}

/// Hub with ten spoke pairs and an attached ten-clique, values as in the component fold
/// checks below. Spoke pair i carries (i, i) and (i, i + 10), clique member i carries
/// (i, i + 20); the hub itself carries no augmentation.
fn build_hub_and_spokes() -> HubAndSpokes {
	let mut g = ConnGraph::with_augmentation( SumMaxAug::combine );
	let hub = Vertex::new();
	let spokes1 : Vec<Vertex> = ( 0..10 ).map( |_| Vertex::new() ).collect();
	let spokes2 : Vec<Vertex> = ( 0..10 ).map( |_| Vertex::new() ).collect();
	let clique : Vec<Vertex> = ( 0..10 ).map( |_| Vertex::new() ).collect();

	for i in 0..10 {
		let value = i as i64;
		g.set_vertex_augmentation( &spokes1[i], SumMaxAug::new( value, value ) ).unwrap();
		g.set_vertex_augmentation( &spokes2[i], SumMaxAug::new( value, value + 10 ) ).unwrap();
		g.set_vertex_augmentation( &clique[i], SumMaxAug::new( value, value + 20 ) ).unwrap();
	}
	for i in 0..10 {
		g.add_edge( &hub, &spokes1[i] ).unwrap();
		g.add_edge( &hub, &spokes2[i] ).unwrap();
		g.add_edge( &spokes1[i], &spokes2[i] ).unwrap();
	}
	for i in 0..10 {
		for j in ( i + 1 )..10 {
			g.add_edge( &clique[i], &clique[j] ).unwrap();
		}
	}
	g.add_edge( &hub, &clique[0] ).unwrap();

	HubAndSpokes { g, hub, spokes1, spokes2, clique }
}

fn component_fold( g : &ConnGraph<I64SumMaxAug>, v : &Vertex ) -> (i64, i64) {
	let aug = g.get_component_info( v ).augmentation.unwrap();
	( aug.sum(), aug.max() )
}

#[test]
fn test_hub_and_spokes_fold() {
	let mut t = build_hub_and_spokes();
	assert_eq!( t.g.get_component_info( &t.hub ).size, 31 );
	assert_eq!( component_fold( &t.g, &t.hub ), ( 135, 29 ) );

	// Spoke pair 5 stays attached through its partner edge.
	t.g.remove_edge( &t.hub, &t.spokes1[5] ).unwrap();
	assert_eq!( component_fold( &t.g, &t.hub ), ( 135, 29 ) );

	// Severing the partner too drops the pair's (5,5) and (5,15).
	t.g.remove_edge( &t.hub, &t.spokes2[5] ).unwrap();
	assert_eq!( component_fold( &t.g, &t.hub ), ( 125, 29 ) );
	assert_eq!( component_fold( &t.g, &t.spokes1[5] ), ( 10, 15 ) );

	// Reattaching restores the full fold.
	t.g.add_edge( &t.hub, &t.spokes1[5] ).unwrap();
	assert_eq!( component_fold( &t.g, &t.hub ), ( 135, 29 ) );

	// Splitting off the clique splits the fold.
	t.g.remove_edge( &t.hub, &t.clique[0] ).unwrap();
	assert_eq!( component_fold( &t.g, &t.hub ), ( 90, 19 ) );
	assert_eq!( component_fold( &t.g, &t.clique[3] ), ( 45, 29 ) );
	assert_eq!( t.g.get_component_info( &t.clique[3] ).size, 10 );
}

#[test]
fn test_component_has_augmentation_tracks_members() {
	let mut g = ConnGraph::with_augmentation( |a : &i64, b : &i64| a + b );
	let u = Vertex::new();
	let v = Vertex::new();
	let w = Vertex::new();
	g.add_edge( &u, &v ).unwrap();
	g.add_edge( &v, &w ).unwrap();
	assert!( !g.component_has_augmentation( &u ) );

	g.set_vertex_augmentation( &w, 3 ).unwrap();
	assert!( g.component_has_augmentation( &u ) );
	assert_eq!( g.vertex_has_augmentation( &u ), Ok( false ) );
	assert_eq!( g.vertex_has_augmentation( &w ), Ok( true ) );

	g.remove_edge( &v, &w ).unwrap();
	assert!( !g.component_has_augmentation( &u ) );
	assert!( g.component_has_augmentation( &w ) );

	g.remove_vertex_augmentation( &w ).unwrap();
	assert!( !g.component_has_augmentation( &w ) );
}

#[test]
fn test_fold_matches_naive_oracle() {
	// Non-commutative-safe check: both sides fold in component order with the same
	// commutative function, so the sums must agree exactly.
	let mut g = ConnGraph::with_augmentation( |a : &i64, b : &i64| a + b );
	let mut naive = NaiveConnGraph::with_augmentation( |a : &i64, b : &i64| a + b );
	let vs : Vec<Vertex> = ( 0..12 ).map( |_| Vertex::new() ).collect();

	for ( i, v ) in vs.iter().enumerate() {
		if i % 3 != 0 {
			g.set_vertex_augmentation( v, i as i64 ).unwrap();
			naive.set_vertex_augmentation( v, i as i64 ).unwrap();
		}
	}
	let edges = [( 0, 1 ), ( 1, 2 ), ( 2, 3 ), ( 4, 5 ), ( 5, 6 ), ( 7, 8 ), ( 0, 3 ), ( 6, 4 )];
	for ( u, v ) in edges {
		g.add_edge( &vs[u], &vs[v] ).unwrap();
		naive.add_edge( &vs[u], &vs[v] ).unwrap();
	}
	g.remove_edge( &vs[1], &vs[2] ).unwrap();
	naive.remove_edge( &vs[1], &vs[2] ).unwrap();

	for v in &vs {
		let mine = g.get_component_info( v );
		let expected = naive.get_component_info( v );
		assert_eq!( mine.size, expected.size );
		assert_eq!( mine.augmentation, expected.augmentation );
		assert_eq!( g.component_has_augmentation( v ), naive.component_has_augmentation( v ) );
	}
}

#[test]
fn test_augmentation_survives_optimize() {
	let mut t = build_hub_and_spokes();
	t.g.remove_edge( &t.hub, &t.spokes1[2] ).unwrap();
	t.g.remove_edge( &t.spokes1[2], &t.spokes2[2] ).unwrap();
	t.g.optimize();
	assert_eq!( component_fold( &t.g, &t.hub ), ( 133, 29 ) );
	assert_eq!( component_fold( &t.g, &t.spokes1[2] ), ( 2, 2 ) );
	assert!( t.g.is_connected( &t.hub, &t.spokes2[2] ) );
	assert!( !t.g.is_connected( &t.hub, &t.spokes1[2] ) );
}
