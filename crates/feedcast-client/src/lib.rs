//! Client-side reconciliation for feedcast sessions.
//!
//! A browser session holds a [`FeedView`], seeds it with a full feed fetch,
//! and then keeps it current two ways: merging its own mutations the moment
//! the mutation API confirms them, and merging everyone else's as broadcast
//! events arrive. Emission is fire-and-forget — the `record_*` methods return
//! the `ClientEvent` to send, and a failed send never rolls the view back;
//! other sessions just stay stale until their next refetch.

pub mod feed;

pub use feed::FeedView;
