//! The layered forest of Holm, de Lichtenberg and Thorup.
//!
//! Levels are stored as *depth below the top*: depth 0 is the top level, and `lower` links lead
//! one level down. Every edge is owned by exactly one depth; a tree edge additionally has a
//! representative in every forest above its own depth, chained through [TreeEdgeRec::higher].
//! The forests are nested: the forest at depth d+1 is a subforest of the one at depth d, and the
//! top forest spans the whole graph, so two vertices are connected exactly when their top-level
//! Euler-tour trees share a root.
//!
//! Pushing an edge one level down is the engine of the amortization argument: an edge can fall at
//! most `max_log_v` times, and each fall costs one logarithmic tree operation. The replacement
//! search after a tree-edge cut pays for itself by pushing everything it inspects.

use std::collections::HashSet;

use crate::arena::{Arena, EdgeIdx, EdgeTag, EulerVertIdx, NodeIdx, NodeTag, TreeEdgeIdx, TreeEdgeTag, VertTag};
use crate::euler::{Ett, EulerVertex};
use crate::rbtree::{EttNode, Rbt, is_nil};

/// How far the vertex count must fall below the high-water mark before surplus levels are
/// collapsed.
const REBUILD_SLACK : usize = 2;

/// The user's augmentation fold.
pub( crate ) type Combine<TAug> = Box<dyn Fn( &TAug, &TAug ) -> TAug>;

/// Ceiling of the base-2 logarithm; 0 for 0 or 1.
fn ceil_log2( n : usize ) -> usize {
	if n <= 1 {
		0
	}
	else {
		( usize::BITS - ( n - 1 ).leading_zeros() ) as usize
	}
}


/// Representative of a forest edge at one depth.
pub( crate ) struct TreeEdgeRec {
	/// The dedicated visit of the parent-side endpoint preceding the traversal into the subtree.
	pub visit1 : NodeIdx,

	/// The dedicated visit closing the subtree-side tour.
	pub visit2 : NodeIdx,

	/// The same edge one level up. `None` at the top.
	pub higher : Option<TreeEdgeIdx>,

	pub depth : usize
}

/// One undirected edge of the graph, whatever its current depth and classification.
///
/// The edge sits in exactly one adjacency list per endpoint: the forest list when it is a tree
/// edge (`tree_edge` points at its deepest representative), the graph list otherwise. The list
/// links are intrusive and per-endpoint.
pub( crate ) struct GraphEdgeRec {
	pub v1 : EulerVertIdx,
	pub v2 : EulerVertIdx,
	pub tree_edge : Option<TreeEdgeIdx>,
	pub prev1 : Option<EdgeIdx>,
	pub next1 : Option<EdgeIdx>,
	pub prev2 : Option<EdgeIdx>,
	pub next2 : Option<EdgeIdx>
}

impl GraphEdgeRec {
	fn new( v1 : EulerVertIdx, v2 : EulerVertIdx ) -> Self {
		GraphEdgeRec {
			v1, v2, tree_edge : None,
			prev1 : None, next1 : None, prev2 : None, next2 : None
		}
	}

	/// The endpoint that is not `v`.
	pub fn other( &self, v : EulerVertIdx ) -> EulerVertIdx {
		debug_assert!( v == self.v1 || v == self.v2 );
		if v == self.v1 { self.v2 } else { self.v1 }
	}

	fn next_for( &self, v : EulerVertIdx ) -> Option<EdgeIdx> {
		if v == self.v1 { self.next1 } else { self.next2 }
	}

	fn prev_for( &self, v : EulerVertIdx ) -> Option<EdgeIdx> {
		if v == self.v1 { self.prev1 } else { self.prev2 }
	}

	fn set_next_for( &mut self, v : EulerVertIdx, e : Option<EdgeIdx> ) {
		debug_assert!( v == self.v1 || v == self.v2 );
		if v == self.v1 { self.next1 = e } else { self.next2 = e }
	}

	fn set_prev_for( &mut self, v : EulerVertIdx, e : Option<EdgeIdx> ) {
		debug_assert!( v == self.v1 || v == self.v2 );
		if v == self.v1 { self.prev1 = e } else { self.prev2 = e }
	}
}


/// The full layered structure: arenas, the augmentation fold and the level budget.
pub( crate ) struct HltForest<TAug> {
	nodes : Arena<NodeTag, EttNode<TAug>>,
	verts : Arena<VertTag, EulerVertex<TAug>>,
	tree_edges : Arena<TreeEdgeTag, TreeEdgeRec>,
	pub edges : Arena<EdgeTag, GraphEdgeRec>,
	combine : Option<Combine<TAug>>,

	/// ⌈log₂ of the highest top-level vertex count since the last rebuild⌉. Also the deepest
	/// level an edge may be pushed to.
	max_log_v : usize,

	/// Current number of top-level vertices.
	num_vertices : usize
}

impl<TAug : Clone> HltForest<TAug> {
	pub fn new( combine : Option<Combine<TAug>> ) -> Self {
		let mut forest = HltForest {
			nodes : Arena::new(),
			verts : Arena::new(),
			tree_edges : Arena::new(),
			edges : Arena::new(),
			combine,
			max_log_v : 0,
			num_vertices : 0
		};
		forest.seed_arenas();
		forest
	}

	fn seed_arenas( &mut self ) {
		let sentinel = self.nodes.insert( EttNode::sentinel() );
		debug_assert!( is_nil( sentinel ) );
		// Dummy vertex so the sentinel's vertex index points at something.
		self.verts.insert( EulerVertex::new( usize::MAX ) );
	}

	pub fn clear( &mut self ) {
		self.nodes.clear();
		self.verts.clear();
		self.tree_edges.clear();
		self.edges.clear();
		self.max_log_v = 0;
		self.num_vertices = 0;
		self.seed_arenas();
	}

	pub fn ett( &mut self ) -> Ett<'_, TAug> {
		Ett {
			nodes : &mut self.nodes,
			verts : &mut self.verts,
			combine : self.combine.as_deref()
		}
	}

	fn rbt( &mut self ) -> Rbt<'_, TAug> {
		Rbt { nodes : &mut self.nodes, combine : self.combine.as_deref() }
	}

	pub fn has_combine( &self ) -> bool {
		self.combine.is_some()
	}

	// ------------------------------------------------------------------------------------------
	// Vertices

	/// Allocates a fresh top-level vertex with a one-visit tour.
	pub fn create_vertex( &mut self ) -> EulerVertIdx {
		let v = self.verts.insert( EulerVertex::new( 0 ) );
		self.ett().new_singleton_visit( v );
		self.num_vertices += 1;
		self.max_log_v = self.max_log_v.max( ceil_log2( self.num_vertices ) );
		v
	}

	/// Frees a top-level vertex together with its whole chain of lower representatives. Every
	/// representative must be edge-free by now; the lower ones may linger from earlier
	/// push-downs that the replacement search had no reason to reclaim.
	pub fn delete_vertex( &mut self, v : EulerVertIdx ) {
		debug_assert!( self.verts[v].depth == 0 );
		debug_assert!( self.verts[v].aug.is_none() );
		let mut cur = Some( v );
		while let Some( x ) = cur {
			let vert = &self.verts[x];
			debug_assert!( vert.graph_head.is_none() && vert.forest_head.is_none(),
				"deleting a vertex that still has edges" );
			let visit = vert.arbitrary_visit;
			debug_assert!( self.nodes[visit].size == 1 );
			cur = vert.lower;
			self.nodes.remove( visit );
			self.verts.remove( x );
		}
		self.num_vertices -= 1;
		self.maybe_rebuild();
	}

	/// Root of the tour containing the vertex, by a plain parent walk. Works on a shared
	/// reference, so queries never need mutable access.
	pub fn tree_root_ref( &self, v : EulerVertIdx ) -> NodeIdx {
		let mut x = self.verts[v].arbitrary_visit;
		while !is_nil( self.nodes[x].parent ) {
			x = self.nodes[x].parent;
		}
		x
	}

	pub fn connected( &self, u : EulerVertIdx, v : EulerVertIdx ) -> bool {
		self.tree_root_ref( u ) == self.tree_root_ref( v )
	}

	pub fn component_size( &self, v : EulerVertIdx ) -> usize {
		self.component_size_of_root( self.tree_root_ref( v ) )
	}

	pub fn component_size_of_root( &self, root : NodeIdx ) -> usize {
		( self.nodes[root].size + 2 ) / 3
	}

	pub fn component_aug( &self, v : EulerVertIdx ) -> Option<TAug> {
		self.nodes[self.tree_root_ref( v )].aug.clone()
	}

	pub fn component_aug_of_root( &self, root : NodeIdx ) -> Option<TAug> {
		self.nodes[root].aug.clone()
	}

	pub fn vertex_aug( &self, v : EulerVertIdx ) -> Option<&TAug> {
		self.verts[v].aug.as_ref()
	}

	/// Stores or removes the user augmentation of a top-level vertex and refreshes the fold
	/// chain above its arbitrary visit. Returns the previous value.
	pub fn set_vertex_aug( &mut self, v : EulerVertIdx, aug : Option<TAug> ) -> Option<TAug> {
		debug_assert!( self.verts[v].depth == 0 );
		let old = std::mem::replace( &mut self.verts[v].aug, aug );
		self.ett().refresh_vertex( v );
		old
	}

	// ------------------------------------------------------------------------------------------
	// Adjacency lists

	/// Pushes an edge onto the head of one endpoint's graph or forest list.
	fn push_edge( &mut self, v : EulerVertIdx, e : EdgeIdx, forest : bool ) {
		let head = if forest { self.verts[v].forest_head } else { self.verts[v].graph_head };
		{
			let rec = &mut self.edges[e];
			rec.set_prev_for( v, None );
			rec.set_next_for( v, head );
		}
		if let Some( h ) = head {
			self.edges[h].set_prev_for( v, Some( e ) );
		}
		if forest {
			self.verts[v].forest_head = Some( e );
		}
		else {
			self.verts[v].graph_head = Some( e );
		}
	}

	/// Unlinks an edge from one endpoint's graph or forest list.
	fn unlink_edge( &mut self, v : EulerVertIdx, e : EdgeIdx, forest : bool ) {
		let ( prev, next ) = {
			let rec = &self.edges[e];
			( rec.prev_for( v ), rec.next_for( v ) )
		};
		match prev {
			Some( p ) => self.edges[p].set_next_for( v, next ),
			None => {
				if forest {
					debug_assert!( self.verts[v].forest_head == Some( e ) );
					self.verts[v].forest_head = next;
				}
				else {
					debug_assert!( self.verts[v].graph_head == Some( e ) );
					self.verts[v].graph_head = next;
				}
			}
		}
		if let Some( nx ) = next {
			self.edges[nx].set_prev_for( v, prev );
		}
		let rec = &mut self.edges[e];
		rec.set_prev_for( v, None );
		rec.set_next_for( v, None );
	}

	// ------------------------------------------------------------------------------------------
	// Edge insertion

	/// Adds the edge between two top-level vertices. Tree or non-tree is decided by the current
	/// top forest; either way the edge starts at depth 0.
	pub fn add_edge( &mut self, u : EulerVertIdx, v : EulerVertIdx ) -> EdgeIdx {
		debug_assert!( u != v );
		debug_assert!( self.verts[u].depth == 0 && self.verts[v].depth == 0 );

		if self.connected( u, v ) {
			let e = self.edges.insert( GraphEdgeRec::new( u, v ) );
			self.push_edge( u, e, false );
			self.push_edge( v, e, false );
			let mut ett = self.ett();
			ett.refresh_vertex( u );
			ett.refresh_vertex( v );
			e
		}
		else {
			let ( w1, w2 ) = self.ett().link( u, v );
			let te = self.tree_edges.insert( TreeEdgeRec {
				visit1 : w1, visit2 : w2, higher : None, depth : 0
			} );
			let e = self.edges.insert( GraphEdgeRec::new( u, v ) );
			self.edges[e].tree_edge = Some( te );
			self.push_edge( u, e, true );
			self.push_edge( v, e, true );
			let mut ett = self.ett();
			ett.refresh_vertex( u );
			ett.refresh_vertex( v );
			e
		}
	}

	// ------------------------------------------------------------------------------------------
	// Edge removal and replacement search

	/// Removes an edge. For a tree edge this cuts every forest it appears in and runs the
	/// replacement search; the components either reconnect through a former non-tree edge or
	/// stay split.
	pub fn remove_edge( &mut self, e : EdgeIdx ) {
		let ( u, v, bottom ) = {
			let rec = &self.edges[e];
			( rec.v1, rec.v2, rec.tree_edge )
		};

		let Some( bottom ) = bottom else {
			self.unlink_edge( u, e, false );
			self.unlink_edge( v, e, false );
			self.edges.remove( e );
			let mut ett = self.ett();
			ett.refresh_vertex( u );
			ett.refresh_vertex( v );
			return;
		};

		self.unlink_edge( u, e, true );
		self.unlink_edge( v, e, true );
		self.edges.remove( e );
		{
			let mut ett = self.ett();
			ett.refresh_vertex( u );
			ett.refresh_vertex( v );
		}

		// Cut the edge out of every forest it appears in, deepest first, remembering the two
		// pieces per depth.
		let mut pieces : Vec<(usize, NodeIdx, NodeIdx)> = Vec::new();
		let mut te_opt = Some( bottom );
		while let Some( te ) = te_opt {
			let rec = self.tree_edges.remove( te );
			let ( a, b ) = self.ett().cut( rec.visit1, rec.visit2 );
			pieces.push( ( rec.depth, a, b ) );
			te_opt = rec.higher;
		}

		// Search for a replacement, starting at the edge's own depth and moving toward the top.
		// A replacement found at some depth reconnects every shallower forest as well.
		for &( depth, r1, r2 ) in &pieces {
			if self.search_level( depth, r1, r2 ) {
				return;
			}
			self.maybe_reclaim( r1 );
			self.maybe_reclaim( r2 );
		}
	}

	/// One level of the replacement search. Returns true if a replacement edge was found and
	/// promoted.
	fn search_level( &mut self, depth : usize, r1 : NodeIdx, r2 : NodeIdx ) -> bool {
		// Work on the smaller piece; this is what bounds the number of push-downs.
		let t_root = if self.nodes[r1].size <= self.nodes[r2].size { r1 } else { r2 };

		// Push every tree edge owned by this level inside T one level down. This keeps the
		// nesting of the forests intact when non-tree edges follow.
		while self.nodes[t_root].has_forest_edge {
			let vert = self.find_flagged_vertex( t_root, true );
			while let Some( e ) = self.verts[vert].forest_head {
				self.push_down_tree_edge( e );
			}
		}

		// Scan the non-tree edges of T. An edge leaving T reconnects the pieces; an internal
		// edge is pushed down and never looked at again on this level.
		while self.nodes[t_root].has_graph_edge {
			let vert = self.find_flagged_vertex( t_root, false );
			while let Some( e ) = self.verts[vert].graph_head {
				let other = self.edges[e].other( vert );
				if self.ett().tree_root( other ) != t_root {
					let ( a, b ) = ( self.edges[e].v1, self.edges[e].v2 );
					self.unlink_edge( a, e, false );
					self.unlink_edge( b, e, false );
					{
						let mut ett = self.ett();
						ett.refresh_vertex( a );
						ett.refresh_vertex( b );
					}
					self.promote_to_tree( e, depth );
					return true;
				}
				self.push_down_graph_edge( e );
			}
		}
		false
	}

	/// Finds a vertex inside the tree under `root` whose forest (or graph) list is non-empty,
	/// by descending along the aggregate flags.
	fn find_flagged_vertex( &self, root : NodeIdx, forest : bool ) -> EulerVertIdx {
		let flag = |node : &EttNode<TAug>| {
			if forest { node.has_forest_edge } else { node.has_graph_edge }
		};
		let self_flag = |node : &EttNode<TAug>| {
			if forest { node.self_forest_edge } else { node.self_graph_edge }
		};
		let mut cur = root;
		loop {
			debug_assert!( !is_nil( cur ), "flag set without a flagged descendant" );
			let node = &self.nodes[cur];
			if flag( &self.nodes[node.left] ) {
				cur = node.left;
			}
			else if self_flag( node ) {
				return node.vertex;
			}
			else {
				cur = node.right;
			}
		}
	}

	/// The same vertex one level down, allocating the representative (with a one-visit tour)
	/// if it does not exist yet.
	fn ensure_lower( &mut self, v : EulerVertIdx ) -> EulerVertIdx {
		if let Some( l ) = self.verts[v].lower {
			return l;
		}
		let depth = self.verts[v].depth + 1;
		debug_assert!( depth <= self.max_log_v, "pushing past the deepest level" );
		let l = self.verts.insert( EulerVertex::new( depth ) );
		self.verts[l].higher = Some( v );
		self.verts[v].lower = Some( l );
		self.ett().new_singleton_visit( l );
		l
	}

	/// Pushes a tree edge one level down: links the lower representatives, grows the tree-edge
	/// chain at the bottom and moves the edge into the lower forest lists.
	fn push_down_tree_edge( &mut self, e : EdgeIdx ) {
		let ( u, v, old_bottom ) = {
			let rec = &self.edges[e];
			( rec.v1, rec.v2, rec.tree_edge.expect( "pushing a non-tree edge as tree edge" ) )
		};
		let lu = self.ensure_lower( u );
		let lv = self.ensure_lower( v );

		let ( w1, w2 ) = self.ett().link( lu, lv );
		let depth = self.verts[lu].depth;
		let te = self.tree_edges.insert( TreeEdgeRec {
			visit1 : w1, visit2 : w2, higher : Some( old_bottom ), depth
		} );

		self.unlink_edge( u, e, true );
		self.unlink_edge( v, e, true );
		{
			let rec = &mut self.edges[e];
			rec.tree_edge = Some( te );
			rec.v1 = lu;
			rec.v2 = lv;
		}
		self.push_edge( lu, e, true );
		self.push_edge( lv, e, true );

		let mut ett = self.ett();
		ett.refresh_vertex( u );
		ett.refresh_vertex( v );
		ett.refresh_vertex( lu );
		ett.refresh_vertex( lv );
	}

	/// Pushes a non-tree edge one level down. The endpoints are already connected there via the
	/// tree edges pushed beforehand, so no forest changes.
	fn push_down_graph_edge( &mut self, e : EdgeIdx ) {
		let ( u, v ) = {
			let rec = &self.edges[e];
			( rec.v1, rec.v2 )
		};
		self.unlink_edge( u, e, false );
		self.unlink_edge( v, e, false );
		let lu = self.ensure_lower( u );
		let lv = self.ensure_lower( v );
		{
			let rec = &mut self.edges[e];
			rec.v1 = lu;
			rec.v2 = lv;
		}
		self.push_edge( lu, e, false );
		self.push_edge( lv, e, false );

		let mut ett = self.ett();
		ett.refresh_vertex( u );
		ett.refresh_vertex( v );
		ett.refresh_vertex( lu );
		ett.refresh_vertex( lv );
	}

	/// Turns a former non-tree edge into the replacement tree edge: links its own level and
	/// every level above it, building the tree-edge chain bottom-up.
	fn promote_to_tree( &mut self, e : EdgeIdx, depth : usize ) {
		let ( u, v ) = {
			let rec = &self.edges[e];
			( rec.v1, rec.v2 )
		};
		debug_assert!( self.verts[u].depth == depth );

		let ( w1, w2 ) = self.ett().link( u, v );
		let te = self.tree_edges.insert( TreeEdgeRec {
			visit1 : w1, visit2 : w2, higher : None, depth
		} );
		self.edges[e].tree_edge = Some( te );
		self.push_edge( u, e, true );
		self.push_edge( v, e, true );
		{
			let mut ett = self.ett();
			ett.refresh_vertex( u );
			ett.refresh_vertex( v );
		}

		// Relink the forests above, up to the top.
		let mut cur_te = te;
		let ( mut hu, mut hv ) = ( self.verts[u].higher, self.verts[v].higher );
		while let ( Some( a ), Some( b ) ) = ( hu, hv ) {
			let ( x1, x2 ) = self.ett().link( a, b );
			let up = self.tree_edges.insert( TreeEdgeRec {
				visit1 : x1, visit2 : x2, higher : None, depth : self.verts[a].depth
			} );
			self.tree_edges[cur_te].higher = Some( up );
			cur_te = up;
			hu = self.verts[a].higher;
			hv = self.verts[b].higher;
		}
		debug_assert!( hu.is_none() && hv.is_none() );
	}

	/// Frees a lower-level representative stranded as a single-vertex tree with no edges, so
	/// long chains below rarely-touched vertices do not pile up.
	fn maybe_reclaim( &mut self, root : NodeIdx ) {
		if self.nodes[root].size != 1 {
			return;
		}
		let v = self.nodes[root].vertex;
		{
			let vert = &self.verts[v];
			if vert.depth == 0 || vert.lower.is_some()
					|| vert.graph_head.is_some() || vert.forest_head.is_some() {
				return;
			}
		}
		let h = self.verts[v].higher.expect( "non-top vertex without a higher link" );
		self.verts[h].lower = None;
		self.nodes.remove( root );
		self.verts.remove( v );
	}

	// ------------------------------------------------------------------------------------------
	// Rebuild

	/// Collapses surplus levels once the vertex count has fallen far enough below the
	/// high-water mark, restoring the O(V log V + E) space bound.
	fn maybe_rebuild( &mut self ) {
		if self.num_vertices == 0 {
			self.max_log_v = 0;
			return;
		}
		if ( self.num_vertices << REBUILD_SLACK ) > ( 1usize << self.max_log_v ) {
			return;
		}
		let new_log = ceil_log2( self.num_vertices );
		for _ in new_log..self.max_log_v {
			self.collapse_top_level();
		}
		self.max_log_v = new_log;
	}

	/// Merges the level below the top into the top: adjacency lists are concatenated upward,
	/// tree-edge chains are retargeted around the vanishing level, the whole level-1 tour
	/// structure is dropped, and everything deeper moves up one depth.
	fn collapse_top_level( &mut self ) {
		// Roots of the level-1 tours, collected before anything is freed.
		let level1_verts : Vec<EulerVertIdx> = self.verts.iter()
			.filter( |(_, vert)| vert.depth == 1 )
			.map( |(i, _)| i )
			.collect();
		if level1_verts.is_empty() {
			return;
		}
		let mut level1_roots : HashSet<NodeIdx> = HashSet::new();
		for &v in &level1_verts {
			let root = self.ett().tree_root( v );
			level1_roots.insert( root );
		}

		// Retarget the chains of tree edges owned below level 1 around their level-1
		// representative.
		for e in self.edges.indices() {
			let Some( bottom ) = self.edges[e].tree_edge else { continue };
			if self.tree_edges[bottom].depth < 2 {
				continue;
			}
			let mut cur = bottom;
			while self.tree_edges[cur].depth > 2 {
				cur = self.tree_edges[cur].higher.unwrap();
			}
			let mid = self.tree_edges[cur].higher.unwrap();
			debug_assert!( self.tree_edges[mid].depth == 1 );
			let rec = self.tree_edges.remove( mid );
			self.tree_edges[cur].higher = rec.higher;
		}

		// Move the level-1 adjacency lists up into the top-level lists, endpoint by endpoint.
		let mut touched_tops : Vec<EulerVertIdx> = Vec::new();
		for &l in &level1_verts {
			let top = self.verts[l].higher.expect( "level-1 vertex without a top representative" );
			touched_tops.push( top );

			while let Some( e ) = self.verts[l].graph_head {
				self.unlink_edge( l, e, false );
				let rec = &mut self.edges[e];
				if rec.v1 == l { rec.v1 = top } else { rec.v2 = top }
				self.push_edge( top, e, false );
			}
			while let Some( e ) = self.verts[l].forest_head {
				self.unlink_edge( l, e, true );
				// The edge was owned by level 1; its bottom representative dies and the
				// top-level one takes over.
				let bottom = self.edges[e].tree_edge.expect( "forest-listed edge without a tree edge" );
				if self.tree_edges[bottom].depth == 1 {
					let rec = self.tree_edges.remove( bottom );
					self.edges[e].tree_edge = rec.higher;
					debug_assert!( rec.higher.is_some() );
				}
				let rec = &mut self.edges[e];
				if rec.v1 == l { rec.v1 = top } else { rec.v2 = top }
				self.push_edge( top, e, true );
			}

			// Splice the vertex chain around the vanishing representative.
			let below = self.verts[l].lower;
			self.verts[top].lower = below;
			if let Some( b ) = below {
				self.verts[b].higher = Some( top );
			}
			self.verts.remove( l );
		}

		// Drop the level-1 tour structure wholesale.
		for root in level1_roots {
			let mut stack = vec![root];
			while let Some( v ) = stack.pop() {
				if is_nil( v ) {
					continue;
				}
				let ( l, r ) = ( self.nodes[v].left, self.nodes[v].right );
				stack.push( l );
				stack.push( r );
				self.nodes.remove( v );
			}
		}

		// Everything deeper moves up one depth.
		for v in self.verts.indices() {
			let d = self.verts[v].depth;
			if d >= 2 && d != usize::MAX {
				self.verts[v].depth = d - 1;
			}
		}
		for te in self.tree_edges.indices() {
			if self.tree_edges[te].depth >= 2 {
				self.tree_edges[te].depth -= 1;
			}
		}

		// Flags on the enlarged top-level lists.
		let mut ett = self.ett();
		for top in touched_tops {
			ett.refresh_vertex( top );
		}
	}

	// ------------------------------------------------------------------------------------------
	// Optimize

	/// Lossless maintenance: sink tree edges as deep as the level budgets allow, then sink each
	/// non-tree edge to the deepest level at which its endpoints are still connected. Deeper
	/// edges make future replacement searches cheaper.
	pub fn optimize( &mut self ) {
		// Tree edges first, so the forests are as deep as possible when the non-tree edges
		// search for their level.
		for e in self.edges.indices() {
			if self.edges[e].tree_edge.is_none() {
				continue;
			}
			loop {
				let ( u, v ) = ( self.edges[e].v1, self.edges[e].v2 );
				let depth = self.verts[u].depth;
				if depth >= self.max_log_v {
					break;
				}
				// The merged component one level down must fit that level's size budget.
				let budget = 1usize << ( self.max_log_v - depth - 1 );
				let nu = self.lower_component_size( u );
				let nv = self.lower_component_size( v );
				if nu + nv > budget {
					break;
				}
				self.push_down_tree_edge( e );
			}
		}

		for e in self.edges.indices() {
			if self.edges[e].tree_edge.is_some() {
				continue;
			}
			let ( u, v ) = ( self.edges[e].v1, self.edges[e].v2 );

			// Representative chains downward from the edge's current level.
			let mut chain_u = vec![u];
			while let Some( l ) = self.verts[*chain_u.last().unwrap()].lower {
				chain_u.push( l );
			}
			let mut chain_v = vec![v];
			while let Some( l ) = self.verts[*chain_v.last().unwrap()].lower {
				chain_v.push( l );
			}

			// Binary search the deepest offset at which the endpoints still share a tree.
			// Connectivity is monotone along the chains, and offset 0 holds by the non-tree
			// edge invariant.
			let mut lo = 0;
			let mut hi = chain_u.len().min( chain_v.len() ) - 1;
			while lo < hi {
				let mid = ( lo + hi + 1 ) / 2;
				let mut ett = self.ett();
				if ett.tree_root( chain_u[mid] ) == ett.tree_root( chain_v[mid] ) {
					lo = mid;
				}
				else {
					hi = mid - 1;
				}
			}
			if lo == 0 {
				continue;
			}
			let ( lu, lv ) = ( chain_u[lo], chain_v[lo] );
			self.unlink_edge( u, e, false );
			self.unlink_edge( v, e, false );
			{
				let rec = &mut self.edges[e];
				rec.v1 = lu;
				rec.v2 = lv;
			}
			self.push_edge( lu, e, false );
			self.push_edge( lv, e, false );
			let mut ett = self.ett();
			ett.refresh_vertex( u );
			ett.refresh_vertex( v );
			ett.refresh_vertex( lu );
			ett.refresh_vertex( lv );
		}
	}

	/// Vertex count of the component one level below `v`, or 1 if no representative exists yet.
	fn lower_component_size( &mut self, v : EulerVertIdx ) -> usize {
		match self.verts[v].lower {
			Some( l ) => {
				let mut ett = self.ett();
				let root = ett.tree_root( l );
				ett.vertex_count( root )
			}
			None => 1
		}
	}
}

#[cfg( any( test, feature = "verify_hlt" ) )]
impl<TAug : Clone> HltForest<TAug> {
	/// Walks the given endpoint's list looking for the edge.
	fn list_contains( &self, v : EulerVertIdx, e : EdgeIdx, forest : bool ) -> bool {
		let mut cur = if forest { self.verts[v].forest_head } else { self.verts[v].graph_head };
		while let Some( x ) = cur {
			if x == e {
				return true;
			}
			cur = self.edges[x].next_for( v );
		}
		false
	}

	/// Exhaustively checks the layered structure: per-tree red-black and aggregate validity,
	/// tour arithmetic, vertex chains, edge list membership, tree-edge chains and the dedicated
	/// visit properties. Slow; compiled for tests and the `verify_hlt` feature only.
	pub fn check_invariants( &mut self ) {
		let vert_ids : Vec<EulerVertIdx> = self.verts.iter()
			.filter( |(_, vert)| vert.depth != usize::MAX )
			.map( |(i, _)| i )
			.collect();

		let mut roots : HashSet<NodeIdx> = HashSet::new();
		for &v in &vert_ids {
			let root = self.ett().tree_root( v );
			roots.insert( root );

			let vert = &self.verts[v];
			let arb = vert.arbitrary_visit;
			assert_eq!( self.nodes[arb].vertex, v, "arbitrary visit of a different vertex" );
			assert_eq!( self.nodes[arb].self_graph_edge, vert.graph_head.is_some() );
			assert_eq!( self.nodes[arb].self_forest_edge, vert.forest_head.is_some() );
			if vert.depth == 0 {
				assert!( vert.higher.is_none() );
			}
			else {
				assert!( vert.aug.is_none(), "augmentation below the top level" );
				let h = vert.higher.expect( "non-top vertex without a higher link" );
				assert_eq!( self.verts[h].lower, Some( v ) );
				assert_eq!( self.verts[h].depth + 1, vert.depth );
			}
			if let Some( l ) = vert.lower {
				assert_eq!( self.verts[l].higher, Some( v ) );
			}
			assert!( vert.depth <= self.max_log_v, "vertex below the deepest permitted level" );
		}

		for &root in &roots {
			let t = self.rbt();
			t.validate( root );
			assert_eq!( self.nodes[root].size % 3, 1,
				"tour length is not of the form 3N-2" );
		}

		for e in self.edges.indices() {
			let ( v1, v2, tree_edge ) = {
				let rec = &self.edges[e];
				( rec.v1, rec.v2, rec.tree_edge )
			};
			assert!( v1 != v2, "self-loop edge record" );
			assert_eq!( self.verts[v1].depth, self.verts[v2].depth,
				"edge endpoints at different depths" );
			let own_depth = self.verts[v1].depth;

			let in_forest = tree_edge.is_some();
			assert!( self.list_contains( v1, e, in_forest ) );
			assert!( self.list_contains( v2, e, in_forest ) );
			assert!( !self.list_contains( v1, e, !in_forest ) );
			assert!( !self.list_contains( v2, e, !in_forest ) );

			match tree_edge {
				None => {
					// A non-tree edge is spanned by the forest of its own level.
					let mut ett = self.ett();
					assert!( ett.tree_root( v1 ) == ett.tree_root( v2 ),
						"non-tree edge with disconnected endpoints" );
				}
				Some( bottom ) => {
					// The chain covers every level from the edge's own up to the top, and the
					// dedicated visits at each level pair up with surviving neighbour visits
					// of the right vertices.
					let mut expected_depth = own_depth;
					let mut cur = Some( bottom );
					while let Some( te ) = cur {
						let ( w1, w2, higher ) = {
							let rec = &self.tree_edges[te];
							( rec.visit1, rec.visit2, rec.higher )
						};
						assert_eq!( self.tree_edges[te].depth, expected_depth,
							"tree-edge chain with a depth gap" );
						let u_vert = self.nodes[w1].vertex;
						let v_vert = self.nodes[w2].vertex;
						assert_eq!( self.verts[u_vert].depth, expected_depth );

						{
							let t = self.rbt();
							assert_eq!( t.root_of( w1 ), t.root_of( w2 ),
								"dedicated visits in different trees" );
						}

						// The visit after the subtree span belongs to the parent-side vertex,
						// the span head to the subtree-side vertex.
						let ( s2, s1 ) = {
							let mut ett = self.ett();
							( ett.cyclic_successor( w2 ), ett.cyclic_successor( w1 ) )
						};
						assert_eq!( self.nodes[s2].vertex, u_vert );
						assert_eq!( self.nodes[s1].vertex, v_vert );

						cur = higher;
						expected_depth = expected_depth.wrapping_sub( 1 );
					}
					assert_eq!( expected_depth, usize::MAX,
						"tree-edge chain does not reach the top" );
				}
			}
		}
	}
}
