//! Euler-tour trees: balanced trees whose in-order sequence is the Euler tour of one tree in a
//! spanning forest.
//!
//! Each node of the tree is one *visit* to a vertex. A tree of N vertices is represented by
//! 3N − 2 visits: one per vertex, plus two dedicated visits per forest edge (created by [Ett::link]
//! and destroyed by [Ett::cut], so no two edges ever share a visit). Each vertex designates one of
//! its visits as the *arbitrary visit*; only that node carries the vertex's contribution to the
//! flag and user-augmentation aggregates.
//!
//! The tour is cyclic; the tree stores one linearization of it. For a forest edge `(u, v)` with
//! dedicated visits `(visit1, visit2)`, the cyclic span from the successor of `visit1` through
//! `visit2` is exactly the tour of the subtree on the `v` side, `visit1` is a visit of `u`
//! preceding the edge traversal, and the cyclic successor of `visit2` is again a visit of `u`.
//! These span properties survive every link (links insert cyclically right before the split
//! vertex's arbitrary visit) and are what make [Ett::cut] safe.

use std::cmp::Ordering;

use crate::arena::{Arena, EdgeIdx, EulerVertIdx, NodeIdx, NodeTag, VertTag};
use crate::rbtree::{EttNode, Rbt, is_nil, nil};

/// One vertex at one level of the layered forest.
pub( crate ) struct EulerVertex<TAug> {
	/// The same vertex one level up, toward the top. `None` only at the top level.
	pub higher : Option<EulerVertIdx>,

	/// The same vertex one level down. Allocated lazily by the push-down machinery.
	pub lower : Option<EulerVertIdx>,

	/// One visit of this vertex in the Euler-tour tree of its level.
	pub arbitrary_visit : NodeIdx,

	/// Head of the doubly-linked list of non-tree edges owned by this level.
	pub graph_head : Option<EdgeIdx>,

	/// Head of the doubly-linked list of tree edges owned by this level.
	pub forest_head : Option<EdgeIdx>,

	/// User augmentation. Present on top-level vertices only.
	pub aug : Option<TAug>,

	/// Depth below the top level (the top is 0).
	pub depth : usize
}

impl<TAug> EulerVertex<TAug> {
	pub fn new( depth : usize ) -> Self {
		EulerVertex {
			higher : None, lower : None,
			arbitrary_visit : nil(),
			graph_head : None, forest_head : None,
			aug : None,
			depth
		}
	}
}


/// Euler-tour operations over the borrowed node and vertex arenas.
pub( crate ) struct Ett<'a, TAug> {
	pub nodes : &'a mut Arena<NodeTag, EttNode<TAug>>,
	pub verts : &'a mut Arena<VertTag, EulerVertex<TAug>>,
	pub combine : Option<&'a dyn Fn( &TAug, &TAug ) -> TAug>
}

impl<'a, TAug : Clone> Ett<'a, TAug> {
	fn rbt( &mut self ) -> Rbt<'_, TAug> {
		Rbt { nodes : &mut *self.nodes, combine : self.combine }
	}

	/// Creates the initial one-visit tour for a fresh vertex and returns the visit.
	pub fn new_singleton_visit( &mut self, v : EulerVertIdx ) -> NodeIdx {
		let z = self.nodes.insert( EttNode::new( v ) );
		self.nodes[z].is_red = false;
		self.rbt().augment( z );
		self.verts[v].arbitrary_visit = z;
		z
	}

	/// Number of vertices of the tree with the given root, derived from the visit count.
	pub fn vertex_count( &self, root : NodeIdx ) -> usize {
		debug_assert!( !is_nil( root ) );
		( self.nodes[root].size + 2 ) / 3
	}

	/// Root of the Euler-tour tree containing the given vertex.
	pub fn tree_root( &mut self, v : EulerVertIdx ) -> NodeIdx {
		let visit = self.verts[v].arbitrary_visit;
		self.rbt().root_of( visit )
	}

	/// Cyclic successor of a visit: the next visit of the tour, wrapping around at the end.
	pub fn cyclic_successor( &mut self, x : NodeIdx ) -> NodeIdx {
		let t = self.rbt();
		let s = t.successor( x );
		if !is_nil( s ) {
			s
		}
		else {
			let root = t.root_of( x );
			t.min_node( root )
		}
	}

	/// Re-points the vertex's arbitrary visit, moving the intrinsic aggregate contributions and
	/// refreshing both affected paths.
	pub fn move_arbitrary( &mut self, v : EulerVertIdx, to : NodeIdx ) {
		let from = self.verts[v].arbitrary_visit;
		if from == to {
			return;
		}
		debug_assert!( self.nodes[to].vertex == v, "arbitrary visit of a different vertex" );

		let has_graph = self.verts[v].graph_head.is_some();
		let has_forest = self.verts[v].forest_head.is_some();
		let aug = self.verts[v].aug.clone();
		{
			let node = &mut self.nodes[from];
			node.self_graph_edge = false;
			node.self_forest_edge = false;
			node.self_aug = None;
		}
		{
			let node = &mut self.nodes[to];
			node.self_graph_edge = has_graph;
			node.self_forest_edge = has_forest;
			node.self_aug = aug;
		}
		self.verts[v].arbitrary_visit = to;

		let mut t = Rbt { nodes : &mut *self.nodes, combine : self.combine };
		t.refresh_up( from );
		t.refresh_up( to );
	}

	/// Re-syncs the arbitrary visit's intrinsic contributions with the vertex state (list heads,
	/// augmentation) and refreshes the aggregates above it.
	pub fn refresh_vertex( &mut self, v : EulerVertIdx ) {
		let visit = self.verts[v].arbitrary_visit;
		let has_graph = self.verts[v].graph_head.is_some();
		let has_forest = self.verts[v].forest_head.is_some();
		let aug = self.verts[v].aug.clone();
		{
			let node = &mut self.nodes[visit];
			node.self_graph_edge = has_graph;
			node.self_forest_edge = has_forest;
			node.self_aug = aug;
		}
		self.rbt().refresh_up( visit );
	}

	/// Rotates the tour of `v`'s tree so that it starts at `v`'s arbitrary visit. This is a
	/// cyclic no-op, so no spans or aggregate contributions change.
	fn reroot( &mut self, v : EulerVertIdx ) {
		let visit = self.verts[v].arbitrary_visit;
		let mut t = Rbt { nodes : &mut *self.nodes, combine : self.combine };
		let ( before, after ) = t.split( visit );
		if !is_nil( before ) {
			t.concat( after, before );
		}
	}

	/// Adds the forest edge `(u, v)` by stitching `v`'s tour into `u`'s.
	///
	/// The tours must be distinct. Returns the two dedicated visits `(visit1, visit2)`: `visit1`
	/// is the new visit of `u` that precedes the traversal into the `v` side, `visit2` the new
	/// visit of `v` that closes the `v`-side tour.
	pub fn link( &mut self, u : EulerVertIdx, v : EulerVertIdx ) -> (NodeIdx, NodeIdx) {
		self.reroot( v );
		let v_fresh = self.nodes.insert( EttNode::new( v ) );
		let u_new = self.nodes.insert( EttNode::new( u ) );
		let u_arb = self.verts[u].arbitrary_visit;
		let v_arb = self.verts[v].arbitrary_visit;

		let mut t = Rbt { nodes : &mut *self.nodes, combine : self.combine };
		let v_root = t.root_of( v_arb );
		debug_assert!( t.root_of( u_arb ) != v_root,
			"it seems you're trying to link two vertices of the same tree" );

		// Close v's tour with the fresh visit, then splice the whole of it right before u's
		// arbitrary visit, led by the new visit of u.
		let tv = t.join( v_root, v_fresh, nil() );
		let ( before, after ) = t.split( u_arb );
		let left = t.join( before, u_new, tv );
		t.concat( left, after );

		( u_new, v_fresh )
	}

	/// Removes the forest edge with dedicated visits `(visit1, visit2)`, splitting its tree in
	/// two. Returns the roots of the `u`-side and `v`-side trees, in that order.
	///
	/// Both dedicated visits are freed; if either was an arbitrary visit, the role is first
	/// transferred to a surviving visit of the same vertex.
	pub fn cut( &mut self, visit1 : NodeIdx, visit2 : NodeIdx ) -> (NodeIdx, NodeIdx) {
		let u_vert = self.nodes[visit1].vertex;
		let v_vert = self.nodes[visit2].vertex;

		// The cyclic successor of visit2 is a visit of u; the cyclic successor of visit1 (the
		// head of the subtree span) is a visit of v. Both survive the cut.
		if self.verts[u_vert].arbitrary_visit == visit1 {
			let target = self.cyclic_successor( visit2 );
			self.move_arbitrary( u_vert, target );
		}
		if self.verts[v_vert].arbitrary_visit == visit2 {
			let target = self.cyclic_successor( visit1 );
			self.move_arbitrary( v_vert, target );
		}

		let mut t = Rbt { nodes : &mut *self.nodes, combine : self.combine };
		let ( u_side, v_side );
		match t.order( visit1, visit2 ) {
			Ordering::Less => {
				// The subtree span (visit1, visit2] is one linear segment.
				let span_head = t.successor( visit1 );
				let ( before, rest ) = t.split( span_head );
				let tail_head = t.successor( visit2 );
				let ( span, tail );
				if is_nil( tail_head ) {
					span = rest;
					tail = nil();
				}
				else {
					let ( s, tl ) = t.split( tail_head );
					span = s;
					tail = tl;
				}
				debug_assert!( t.max_node( span ) == visit2 );
				debug_assert!( t.max_node( before ) == visit1 );
				v_side = t.remove( visit2 );
				let before = t.remove( visit1 );
				u_side = t.concat( before, tail );
			}
			Ordering::Greater => {
				// The span wraps around the end of the linearization.
				let p2_end = t.successor( visit2 );
				debug_assert!( !is_nil( p2_end ) );
				let ( p2, rest ) = t.split( p2_end );
				let mid_end = t.successor( visit1 );
				let ( mid, p1 );
				if is_nil( mid_end ) {
					mid = rest;
					p1 = nil();
				}
				else {
					let ( m, r ) = t.split( mid_end );
					mid = m;
					p1 = r;
				}
				debug_assert!( t.max_node( mid ) == visit1 );
				debug_assert!( t.max_node( p2 ) == visit2 );
				u_side = t.remove( visit1 );
				let p2 = t.remove( visit2 );
				v_side = t.concat( p1, p2 );
			}
			Ordering::Equal => unreachable!( "cutting an edge with a single visit" )
		}

		self.nodes.remove( visit1 );
		self.nodes.remove( visit2 );
		( u_side, v_side )
	}
}
