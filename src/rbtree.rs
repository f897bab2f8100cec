//! Augmented order-statistic red-black tree over the node arena.
//!
//! This is the balanced tree underlying every Euler tour. All structural operations (rotations,
//! insertion/deletion fixups, join, split, rank comparison) live here; the Euler-tour semantics
//! are layered on top in [crate::euler].
//!
//! Instead of null children, the tree uses a shared sentinel leaf: slot 0 of the node arena. The
//! sentinel is black, has size 0 and carries no augmentation, so it can safely participate in the
//! usual fixup case analysis. Its parent field is written temporarily during deletion fixup, as
//! is traditional.
//!
//! Augmentations are recomputed by [Rbt::augment], which reports whether anything changed so that
//! upward refreshes can stop early. Reporting a change where there is none is allowed; missing
//! one is not.

use std::cmp::Ordering;

use crate::arena::{Arena, EulerVertIdx, NodeIdx, NodeTag};

/// The shared sentinel leaf.
#[inline]
pub( crate ) fn nil() -> NodeIdx {
	NodeIdx::new( 0 )
}

/// Indicates whether the given node is the sentinel leaf.
#[inline]
pub( crate ) fn is_nil( v : NodeIdx ) -> bool {
	v.index() == 0
}


/// A node of an Euler-tour tree.
///
/// The `self_*` fields hold this node's intrinsic contribution to the subtree aggregates: they
/// are non-trivial only on the node that is currently its vertex's arbitrary visit. The layers
/// above keep them in sync with the vertex state and refresh the aggregates afterwards.
#[derive(Clone)]
pub( crate ) struct EttNode<TAug> {
	pub parent : NodeIdx,
	pub left : NodeIdx,
	pub right : NodeIdx,
	pub is_red : bool,

	/// The Euler-tour vertex this node is a visit of.
	pub vertex : EulerVertIdx,

	/// Number of nodes in this subtree, including this node.
	pub size : usize,

	/// Some descendant is an arbitrary visit of a vertex with a non-empty non-tree edge list.
	pub has_graph_edge : bool,

	/// Some descendant is an arbitrary visit of a vertex with a non-empty tree edge list.
	pub has_forest_edge : bool,

	/// In-order fold of the user augmentations below this node, if any.
	pub aug : Option<TAug>,

	pub self_graph_edge : bool,
	pub self_forest_edge : bool,
	pub self_aug : Option<TAug>
}

impl<TAug> EttNode<TAug> {
	/// A fresh, detached visit of the given vertex.
	///
	/// The size is deliberately stale (zero) so that the first `augment()` always reports a
	/// change and upward refreshes do not stop early.
	pub fn new( vertex : EulerVertIdx ) -> Self {
		EttNode {
			parent : nil(), left : nil(), right : nil(), is_red : true,
			vertex,
			size : 0,
			has_graph_edge : false, has_forest_edge : false, aug : None,
			self_graph_edge : false, self_forest_edge : false, self_aug : None
		}
	}

	/// The sentinel leaf, to be stored in arena slot 0.
	pub fn sentinel() -> Self {
		EttNode {
			parent : nil(), left : nil(), right : nil(), is_red : false,
			vertex : EulerVertIdx::new( 0 ),
			size : 0,
			has_graph_edge : false, has_forest_edge : false, aug : None,
			self_graph_edge : false, self_forest_edge : false, self_aug : None
		}
	}
}


/// Combines two optional augmentation values, skipping missing summands.
fn merge_aug<TAug>( combine : &dyn Fn( &TAug, &TAug ) -> TAug, a : Option<TAug>, b : Option<TAug> )
	-> Option<TAug>
{
	match (a, b) {
		(Some( a ), Some( b )) => Some( combine( &a, &b ) ),
		(a, b) => a.or( b )
	}
}


/// Red-black tree operations over a borrowed node arena.
///
/// `combine` is the user's augmentation fold; `None` disables the fold entirely, leaving only
/// the size and flag aggregates. Trees whose nodes carry no `self_aug` behave identically either
/// way, so a single arena can hold both augmented and unaugmented tours.
pub( crate ) struct Rbt<'a, TAug> {
	pub nodes : &'a mut Arena<NodeTag, EttNode<TAug>>,
	pub combine : Option<&'a dyn Fn( &TAug, &TAug ) -> TAug>
}

impl<'a, TAug : Clone> Rbt<'a, TAug> {
	#[inline]
	fn n( &self, v : NodeIdx ) -> &EttNode<TAug> {
		&self.nodes[v]
	}

	/// Recomputes this node's aggregates from its children and its intrinsic contribution.
	///
	/// Returns false only if nothing changed; ancestors may then skip their refresh. When a user
	/// fold is involved the result is conservatively reported as changed, since augmentation
	/// values are not required to be comparable.
	pub fn augment( &mut self, v : NodeIdx ) -> bool {
		debug_assert!( !is_nil( v ), "augmenting the sentinel leaf" );
		let (l, r) = ( self.n( v ).left, self.n( v ).right );
		let new_size = self.n( l ).size + self.n( r ).size + 1;
		let new_hge = self.n( l ).has_graph_edge || self.n( r ).has_graph_edge
			|| self.n( v ).self_graph_edge;
		let new_hfe = self.n( l ).has_forest_edge || self.n( r ).has_forest_edge
			|| self.n( v ).self_forest_edge;
		let new_aug = match self.combine {
			Some( combine ) => {
				let acc = merge_aug( combine, self.n( l ).aug.clone(), self.n( v ).self_aug.clone() );
				merge_aug( combine, acc, self.n( r ).aug.clone() )
			}
			None => None
		};

		let node = &mut self.nodes[v];
		let changed = node.size != new_size
			|| node.has_graph_edge != new_hge
			|| node.has_forest_edge != new_hfe
			|| node.aug.is_some() || new_aug.is_some();
		node.size = new_size;
		node.has_graph_edge = new_hge;
		node.has_forest_edge = new_hfe;
		node.aug = new_aug;
		changed
	}

	/// Refreshes aggregates from `v` upward, stopping as soon as a node reports no change.
	pub fn refresh_up( &mut self, mut v : NodeIdx ) {
		while !is_nil( v ) {
			if !self.augment( v ) {
				break;
			}
			v = self.n( v ).parent;
		}
	}

	/// Refreshes aggregates from `v` upward and returns the root. The walk always reaches the
	/// root; the augmentation calls stop early as in [Self::refresh_up].
	pub fn refresh_to_root( &mut self, start : NodeIdx ) -> NodeIdx {
		let mut v = start;
		let mut augmenting = true;
		loop {
			if augmenting {
				augmenting = self.augment( v );
			}
			let p = self.n( v ).parent;
			if is_nil( p ) {
				return v;
			}
			v = p;
		}
	}

	/// The root of the tree containing `v`.
	pub fn root_of( &self, mut v : NodeIdx ) -> NodeIdx {
		debug_assert!( !is_nil( v ) );
		while !is_nil( self.n( v ).parent ) {
			v = self.n( v ).parent;
		}
		v
	}

	/// In-order minimum of the subtree rooted at `v`.
	pub fn min_node( &self, mut v : NodeIdx ) -> NodeIdx {
		debug_assert!( !is_nil( v ) );
		while !is_nil( self.n( v ).left ) {
			v = self.n( v ).left;
		}
		v
	}

	/// In-order maximum of the subtree rooted at `v`.
	pub fn max_node( &self, mut v : NodeIdx ) -> NodeIdx {
		debug_assert!( !is_nil( v ) );
		while !is_nil( self.n( v ).right ) {
			v = self.n( v ).right;
		}
		v
	}

	/// In-order successor of `v`, or the sentinel if `v` is the maximum.
	pub fn successor( &self, v : NodeIdx ) -> NodeIdx {
		if !is_nil( self.n( v ).right ) {
			return self.min_node( self.n( v ).right );
		}
		let mut c = v;
		let mut p = self.n( v ).parent;
		while !is_nil( p ) && self.n( p ).right == c {
			c = p;
			p = self.n( p ).parent;
		}
		p
	}

	/// In-order predecessor of `v`, or the sentinel if `v` is the minimum.
	pub fn predecessor( &self, v : NodeIdx ) -> NodeIdx {
		if !is_nil( self.n( v ).left ) {
			return self.max_node( self.n( v ).left );
		}
		let mut c = v;
		let mut p = self.n( v ).parent;
		while !is_nil( p ) && self.n( p ).left == c {
			c = p;
			p = self.n( p ).parent;
		}
		p
	}

	fn depth( &self, mut v : NodeIdx ) -> usize {
		let mut d = 0;
		while !is_nil( self.n( v ).parent ) {
			v = self.n( v ).parent;
			d += 1;
		}
		d
	}

	/// Compares the in-order positions of two nodes of the same tree.
	pub fn order( &self, u : NodeIdx, v : NodeIdx ) -> Ordering {
		debug_assert!( !is_nil( u ) && !is_nil( v ) );
		if u == v {
			return Ordering::Equal;
		}
		debug_assert!( self.root_of( u ) == self.root_of( v ),
			"comparing nodes of different trees" );

		let du = self.depth( u );
		let dv = self.depth( v );
		let (mut u, mut v) = (u, v);
		let mut u_from_right = false;
		let mut v_from_right = false;

		// Depth-equalize, remembering which subtree the deeper node came from.
		for _ in dv..du {
			let p = self.n( u ).parent;
			u_from_right = self.n( p ).right == u;
			u = p;
		}
		for _ in du..dv {
			let p = self.n( v ).parent;
			v_from_right = self.n( p ).right == v;
			v = p;
		}

		if u == v {
			// One node was an ancestor of the other.
			return if du > dv {
				if u_from_right { Ordering::Greater } else { Ordering::Less }
			}
			else {
				if v_from_right { Ordering::Less } else { Ordering::Greater }
			};
		}

		// Walk up in lockstep until the two paths meet.
		while self.n( u ).parent != self.n( v ).parent {
			u = self.n( u ).parent;
			v = self.n( v ).parent;
		}
		let p = self.n( u ).parent;
		debug_assert!( !is_nil( p ) );
		if self.n( p ).left == u { Ordering::Less } else { Ordering::Greater }
	}

	/// Lowest common ancestor of two nodes of the same tree.
	pub fn lca( &self, u : NodeIdx, v : NodeIdx ) -> NodeIdx {
		let du = self.depth( u );
		let dv = self.depth( v );
		let (mut u, mut v) = (u, v);
		for _ in dv..du {
			u = self.n( u ).parent;
		}
		for _ in du..dv {
			v = self.n( v ).parent;
		}
		while u != v {
			u = self.n( u ).parent;
			v = self.n( v ).parent;
		}
		u
	}

	fn rotate_left( &mut self, x : NodeIdx ) {
		let y = self.n( x ).right;
		debug_assert!( !is_nil( y ), "rotating around a missing child" );
		let yl = self.n( y ).left;
		self.nodes[x].right = yl;
		if !is_nil( yl ) {
			self.nodes[yl].parent = x;
		}
		let xp = self.n( x ).parent;
		self.nodes[y].parent = xp;
		if !is_nil( xp ) {
			if self.n( xp ).left == x {
				self.nodes[xp].left = y;
			}
			else {
				self.nodes[xp].right = y;
			}
		}
		self.nodes[y].left = x;
		self.nodes[x].parent = y;
		self.augment( x );
		self.augment( y );
	}

	fn rotate_right( &mut self, x : NodeIdx ) {
		let y = self.n( x ).left;
		debug_assert!( !is_nil( y ), "rotating around a missing child" );
		let yr = self.n( y ).right;
		self.nodes[x].left = yr;
		if !is_nil( yr ) {
			self.nodes[yr].parent = x;
		}
		let xp = self.n( x ).parent;
		self.nodes[y].parent = xp;
		if !is_nil( xp ) {
			if self.n( xp ).left == x {
				self.nodes[xp].left = y;
			}
			else {
				self.nodes[xp].right = y;
			}
		}
		self.nodes[y].right = x;
		self.nodes[x].parent = y;
		self.augment( x );
		self.augment( y );
	}

	/// Restores the red-black invariants after inserting the red node `z`.
	///
	/// Returns true if the root was recolored from red to black, i.e. the black height of the
	/// tree grew by one.
	fn rebalance_insertion( &mut self, mut z : NodeIdx ) -> bool {
		loop {
			let mut p = self.n( z ).parent;
			if is_nil( p ) || !self.n( p ).is_red {
				break;
			}
			let g = self.n( p ).parent;
			debug_assert!( !is_nil( g ) ); // A red node is never the root
			let p_is_left = self.n( g ).left == p;
			let u = if p_is_left { self.n( g ).right } else { self.n( g ).left };
			if self.n( u ).is_red {
				self.nodes[p].is_red = false;
				self.nodes[u].is_red = false;
				self.nodes[g].is_red = true;
				z = g;
				continue;
			}
			if p_is_left {
				if self.n( p ).right == z {
					z = p;
					self.rotate_left( z );
					p = self.n( z ).parent;
				}
				self.nodes[p].is_red = false;
				self.nodes[g].is_red = true;
				self.rotate_right( g );
			}
			else {
				if self.n( p ).left == z {
					z = p;
					self.rotate_right( z );
					p = self.n( z ).parent;
				}
				self.nodes[p].is_red = false;
				self.nodes[g].is_red = true;
				self.rotate_left( g );
			}
			break;
		}
		if is_nil( self.n( z ).parent ) && self.n( z ).is_red {
			self.nodes[z].is_red = false;
			return true;
		}
		false
	}

	/// Insertion fixup. `z` must have been spliced in red by the caller.
	///
	/// Refreshes aggregates on the way up (stopping early once nothing changes) when `augment`
	/// is set, and returns the new root.
	pub fn fix_insertion( &mut self, z : NodeIdx, augment : bool ) -> NodeIdx {
		self.rebalance_insertion( z );
		if augment {
			self.refresh_to_root( z )
		}
		else {
			self.root_of( z )
		}
	}

	/// Like [Self::fix_insertion], but saves the final walk when the caller does not need the
	/// new root.
	pub fn fix_insertion_without_root( &mut self, z : NodeIdx, augment : bool ) {
		self.rebalance_insertion( z );
		if augment {
			self.refresh_up( z );
		}
	}

	/// Inserts the detached node `z` into the tree rooted at `root` (sentinel for an empty
	/// tree), descending by the given comparator. Returns the new root.
	pub fn insert_by( &mut self, root : NodeIdx, z : NodeIdx,
			mut before : impl FnMut( NodeIdx, NodeIdx ) -> bool ) -> NodeIdx
	{
		debug_assert!( is_nil( self.n( z ).parent ), "inserting an attached node" );
		if is_nil( root ) {
			self.nodes[z].is_red = false;
			self.nodes[z].left = nil();
			self.nodes[z].right = nil();
			self.augment( z );
			return z;
		}
		let mut cur = root;
		loop {
			let next = if before( z, cur ) { self.n( cur ).left } else { self.n( cur ).right };
			if is_nil( next ) {
				break;
			}
			cur = next;
		}
		let node = &mut self.nodes[z];
		node.parent = cur;
		node.left = nil();
		node.right = nil();
		node.is_red = true;
		node.size = 0;
		if before( z, cur ) {
			self.nodes[cur].left = z;
		}
		else {
			self.nodes[cur].right = z;
		}
		self.fix_insertion( z, true )
	}

	/// Exchanges `z` with its in-order successor `y` by pointer surgery, preserving all
	/// external pointers into both nodes. `z` must have two children and `y` no left child.
	fn swap_with_successor( &mut self, z : NodeIdx, y : NodeIdx ) {
		let (zp, zl, zr) = ( self.n( z ).parent, self.n( z ).left, self.n( z ).right );
		let yr = self.n( y ).right;
		debug_assert!( !is_nil( zl ) && !is_nil( zr ) );
		debug_assert!( is_nil( self.n( y ).left ) );

		let z_red = self.n( z ).is_red;
		let y_red = self.n( y ).is_red;
		self.nodes[z].is_red = y_red;
		self.nodes[y].is_red = z_red;

		self.nodes[y].parent = zp;
		if !is_nil( zp ) {
			if self.n( zp ).left == z {
				self.nodes[zp].left = y;
			}
			else {
				self.nodes[zp].right = y;
			}
		}
		self.nodes[y].left = zl;
		self.nodes[zl].parent = y;

		if zr == y {
			self.nodes[y].right = z;
			self.nodes[z].parent = y;
		}
		else {
			let yp = self.n( y ).parent;
			debug_assert!( self.n( yp ).left == y ); // y is the minimum of z's right subtree
			self.nodes[y].right = zr;
			self.nodes[zr].parent = y;
			self.nodes[yp].left = z;
			self.nodes[z].parent = yp;
		}
		self.nodes[z].left = nil();
		self.nodes[z].right = yr;
		if !is_nil( yr ) {
			self.nodes[yr].parent = z;
		}
	}

	/// Restores the red-black invariants after removing a black node whose place was taken by
	/// `x` (possibly the sentinel, whose parent has been set accordingly).
	fn rebalance_deletion( &mut self, mut x : NodeIdx ) {
		loop {
			let p = self.n( x ).parent;
			if is_nil( p ) || self.n( x ).is_red {
				break;
			}
			if self.n( p ).left == x {
				let mut w = self.n( p ).right;
				if self.n( w ).is_red {
					self.nodes[w].is_red = false;
					self.nodes[p].is_red = true;
					self.rotate_left( p );
					w = self.n( p ).right;
				}
				if !self.n( self.n( w ).left ).is_red && !self.n( self.n( w ).right ).is_red {
					self.nodes[w].is_red = true;
					x = p;
				}
				else {
					if !self.n( self.n( w ).right ).is_red {
						let wl = self.n( w ).left;
						self.nodes[wl].is_red = false;
						self.nodes[w].is_red = true;
						self.rotate_right( w );
						w = self.n( p ).right;
					}
					self.nodes[w].is_red = self.n( p ).is_red;
					self.nodes[p].is_red = false;
					let wr = self.n( w ).right;
					self.nodes[wr].is_red = false;
					self.rotate_left( p );
					break;
				}
			}
			else {
				let mut w = self.n( p ).left;
				if self.n( w ).is_red {
					self.nodes[w].is_red = false;
					self.nodes[p].is_red = true;
					self.rotate_right( p );
					w = self.n( p ).left;
				}
				if !self.n( self.n( w ).left ).is_red && !self.n( self.n( w ).right ).is_red {
					self.nodes[w].is_red = true;
					x = p;
				}
				else {
					if !self.n( self.n( w ).left ).is_red {
						let wr = self.n( w ).right;
						self.nodes[wr].is_red = false;
						self.nodes[w].is_red = true;
						self.rotate_left( w );
						w = self.n( p ).left;
					}
					self.nodes[w].is_red = self.n( p ).is_red;
					self.nodes[p].is_red = false;
					let wl = self.n( w ).left;
					self.nodes[wl].is_red = false;
					self.rotate_right( p );
					break;
				}
			}
		}
		self.nodes[x].is_red = false; // Harmless if x is the sentinel
	}

	/// Removes `z` from its tree and returns the new root (sentinel if the tree is now empty).
	///
	/// The node itself is merely detached; the caller decides whether to free its arena slot.
	pub fn remove( &mut self, z : NodeIdx ) -> NodeIdx {
		debug_assert!( !is_nil( z ), "removing the sentinel leaf" );
		if !is_nil( self.n( z ).left ) && !is_nil( self.n( z ).right ) {
			let y = self.min_node( self.n( z ).right );
			self.swap_with_successor( z, y );
		}
		// z now has at most one child. Splice in the child; the sentinel's parent is set
		// temporarily so the deletion fixup can navigate from it.
		let child = if !is_nil( self.n( z ).left ) { self.n( z ).left } else { self.n( z ).right };
		let p = self.n( z ).parent;
		self.nodes[child].parent = p;
		if !is_nil( p ) {
			if self.n( p ).left == z {
				self.nodes[p].left = child;
			}
			else {
				self.nodes[p].right = child;
			}
		}
		let z_was_black = !self.n( z ).is_red;

		// Detach z fully.
		let node = &mut self.nodes[z];
		node.parent = nil();
		node.left = nil();
		node.right = nil();
		node.is_red = true;
		node.size = 0;

		if is_nil( p ) && is_nil( child ) {
			self.nodes[nil()].parent = nil();
			return nil(); // The tree is now empty
		}
		if z_was_black {
			self.rebalance_deletion( child );
		}
		self.nodes[nil()].parent = nil();

		let start = if !is_nil( child ) { child } else { p };
		let root = self.refresh_to_root( start );
		// A detached subtree may have surfaced a red node as root; roots are kept black.
		self.nodes[root].is_red = false;
		root
	}

	/// Black height of the subtree rooted at `v`: black nodes on any path down to a leaf,
	/// counting `v` itself but not the sentinel.
	fn black_height( &self, mut v : NodeIdx ) -> usize {
		let mut h = 0;
		while !is_nil( v ) {
			if !self.n( v ).is_red {
				h += 1;
			}
			v = self.n( v ).left;
		}
		h
	}

	/// Joins `l`, the detached `pivot` and `r` into a single tree whose in-order sequence is
	/// `l`, `pivot`, `r`. Either side may be the sentinel. Returns the new root.
	pub fn join( &mut self, l : NodeIdx, pivot : NodeIdx, r : NodeIdx ) -> NodeIdx {
		let lh = self.black_height( l );
		let rh = self.black_height( r );
		self.join_hinted( l, lh, pivot, r, rh ).0
	}

	/// [Self::join] with known black heights, returning the new root and its black height.
	/// This is what keeps [Self::split] at one traversal overall.
	fn join_hinted( &mut self, l : NodeIdx, lh : usize, pivot : NodeIdx, r : NodeIdx, rh : usize )
		-> (NodeIdx, usize)
	{
		debug_assert!( is_nil( self.n( pivot ).parent ),
			"joining around a pivot that is still attached" );
		debug_assert!( lh == self.black_height( l ), "wrong black-height hint for the left tree" );
		debug_assert!( rh == self.black_height( r ), "wrong black-height hint for the right tree" );

		// Detached subtrees may arrive with a red root (split hands them over as-is).
		// Blacken them so the red pivot cannot end up above a red root; this is the one
		// recoloring the insertion fixup could not repair.
		let mut lh = lh;
		let mut rh = rh;
		if !is_nil( l ) && self.n( l ).is_red {
			self.nodes[l].is_red = false;
			lh += 1;
		}
		if !is_nil( r ) && self.n( r ).is_red {
			self.nodes[r].is_red = false;
			rh += 1;
		}

		if is_nil( l ) && is_nil( r ) {
			let node = &mut self.nodes[pivot];
			node.left = nil();
			node.right = nil();
			node.is_red = false;
			self.augment( pivot );
			return ( pivot, 1 );
		}

		// Walk down the boundary spine of the taller tree until reaching a black node of the
		// shorter tree's black height, then splice the pivot in red and fix upward.
		let (c, p);
		if lh >= rh {
			let mut cur = l;
			let mut cur_h = lh;
			let mut par = nil();
			while cur_h > rh || self.n( cur ).is_red {
				if !self.n( cur ).is_red {
					cur_h -= 1;
				}
				par = cur;
				cur = self.n( cur ).right;
			}
			c = cur;
			p = par;
			let node = &mut self.nodes[pivot];
			node.left = c;
			node.right = r;
		}
		else {
			let mut cur = r;
			let mut cur_h = rh;
			let mut par = nil();
			while cur_h > lh || self.n( cur ).is_red {
				if !self.n( cur ).is_red {
					cur_h -= 1;
				}
				par = cur;
				cur = self.n( cur ).left;
			}
			c = cur;
			p = par;
			let node = &mut self.nodes[pivot];
			node.left = l;
			node.right = c;
		}
		let (pl, pr) = ( self.n( pivot ).left, self.n( pivot ).right );
		if !is_nil( pl ) {
			self.nodes[pl].parent = pivot;
		}
		if !is_nil( pr ) {
			self.nodes[pr].parent = pivot;
		}
		let node = &mut self.nodes[pivot];
		node.parent = p;
		node.is_red = true;
		node.size = 0; // Stale on purpose; see EttNode::new
		if !is_nil( p ) {
			if lh >= rh {
				self.nodes[p].right = pivot;
			}
			else {
				self.nodes[p].left = pivot;
			}
		}

		let grew = self.rebalance_insertion( pivot );
		let root = self.refresh_to_root( pivot );
		( root, lh.max( rh ) + grew as usize )
	}

	/// Concatenates two trees without a spare pivot by reusing the minimum of `r`.
	pub fn concat( &mut self, l : NodeIdx, r : NodeIdx ) -> NodeIdx {
		if is_nil( r ) {
			return l;
		}
		if is_nil( l ) {
			return r;
		}
		let m = self.min_node( r );
		let rest = self.remove( m );
		self.join( l, m, rest )
	}

	/// Splits the tree containing `at` into the nodes strictly before `at` and the nodes from
	/// `at` onward, returning both roots (sentinel for an empty side).
	///
	/// Walks from `at` up to the root, concatenating the hanging subtrees onto the two
	/// accumulators; the pivot of each concatenation is the ancestor at which the walk last
	/// turned the other way. Black heights are carried along, so the joins only ever descend
	/// by the difference and the whole split stays logarithmic.
	pub fn split( &mut self, at : NodeIdx ) -> (NodeIdx, NodeIdx) {
		debug_assert!( !is_nil( at ) );

		let mut l_acc = self.n( at ).left;
		let r_sub = self.n( at ).right;
		let sub_bh = self.black_height( l_acc ); // Equals black_height( r_sub )
		let mut l_bh = sub_bh;
		let at_black = !self.n( at ).is_red;

		let mut p = self.n( at ).parent;
		let mut was_right = !is_nil( p ) && self.n( p ).right == at;
		// Height of the original subtree hanging at the position the walk came from.
		let mut spine_bh = sub_bh + at_black as usize;

		if !is_nil( l_acc ) {
			self.nodes[l_acc].parent = nil();
		}
		if !is_nil( r_sub ) {
			self.nodes[r_sub].parent = nil();
		}
		let node = &mut self.nodes[at];
		node.parent = nil();
		node.left = nil();
		node.right = nil();

		// `at` leads the right-hand side.
		let (mut r_acc, mut r_bh) = self.join_hinted( nil(), 0, at, r_sub, sub_bh );

		while !is_nil( p ) {
			let gp = self.n( p ).parent;
			let p_was_right = !is_nil( gp ) && self.n( gp ).right == p;
			let p_black = !self.n( p ).is_red;
			self.nodes[p].parent = nil();

			if was_right {
				// p and its left subtree precede `at`.
				let sib = self.n( p ).left;
				if !is_nil( sib ) {
					self.nodes[sib].parent = nil();
				}
				let (nr, nh) = self.join_hinted( sib, spine_bh, p, l_acc, l_bh );
				l_acc = nr;
				l_bh = nh;
			}
			else {
				let sib = self.n( p ).right;
				if !is_nil( sib ) {
					self.nodes[sib].parent = nil();
				}
				let (nr, nh) = self.join_hinted( r_acc, r_bh, p, sib, spine_bh );
				r_acc = nr;
				r_bh = nh;
			}
			spine_bh += p_black as usize;
			was_right = p_was_right;
			p = gp;
		}
		// The accumulators are handed out as trees in their own right; keep their roots black.
		if !is_nil( l_acc ) {
			self.nodes[l_acc].is_red = false;
		}
		if !is_nil( r_acc ) {
			self.nodes[r_acc].is_red = false;
		}
		( l_acc, r_acc )
	}
}

#[cfg( any( test, feature = "verify_hlt" ) )]
impl<'a, TAug : Clone> Rbt<'a, TAug> {
	/// In-order node sequence of the tree rooted at `root`.
	pub fn inorder( &self, root : NodeIdx ) -> Vec<NodeIdx> {
		let mut result = Vec::new();
		let mut stack = Vec::new();
		let mut cur = root;
		while !is_nil( cur ) || !stack.is_empty() {
			while !is_nil( cur ) {
				stack.push( cur );
				cur = self.n( cur ).left;
			}
			let v = stack.pop().unwrap();
			result.push( v );
			cur = self.n( v ).right;
		}
		result
	}

	/// Checks the red-black invariants, parent back-pointers and aggregate correctness of the
	/// whole tree. Panics on the first violation.
	pub fn validate( &self, root : NodeIdx ) {
		if is_nil( root ) {
			return;
		}
		assert!( is_nil( self.n( root ).parent ), "root with a parent" );
		assert!( !self.n( root ).is_red, "red root" );
		self.validate_rec( root );
	}

	fn validate_rec( &self, v : NodeIdx ) -> usize {
		if is_nil( v ) {
			return 0;
		}
		let (l, r) = ( self.n( v ).left, self.n( v ).right );
		if self.n( v ).is_red {
			assert!( !self.n( l ).is_red && !self.n( r ).is_red, "red child of red node" );
		}
		for c in [l, r] {
			if !is_nil( c ) {
				assert_eq!( self.n( c ).parent, v, "parent pointer disagreement" );
			}
		}
		let lh = self.validate_rec( l );
		let rh = self.validate_rec( r );
		assert_eq!( lh, rh, "black-height mismatch" );

		let node = self.n( v );
		assert_eq!( node.size, self.n( l ).size + self.n( r ).size + 1, "size mismatch" );
		assert_eq!( node.has_graph_edge,
			self.n( l ).has_graph_edge || self.n( r ).has_graph_edge || node.self_graph_edge );
		assert_eq!( node.has_forest_edge,
			self.n( l ).has_forest_edge || self.n( r ).has_forest_edge || node.self_forest_edge );
		lh + !node.is_red as usize
	}

	/// Checks that the in-order sequence respects the given comparator.
	pub fn validate_order( &self, root : NodeIdx,
			mut before : impl FnMut( NodeIdx, NodeIdx ) -> bool )
	{
		use itertools::Itertools;
		for (a, b) in self.inorder( root ).into_iter().tuple_windows() {
			assert!( !before( b, a ), "in-order sequence out of order" );
		}
	}
}
