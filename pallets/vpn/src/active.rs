//! Active sessions indexed by the height of their last bandwidth report.
//!
//! Each bucket is a sorted `Vec<SessionId>`. A session sits in at most one bucket, the
//! one matching its `status_modified_at`.

use crate::{pallet::*, types::SessionId};
use frame_system::pallet_prelude::BlockNumberFor;
use sp_std::prelude::*;

impl<T: Config> Pallet<T> {
	pub fn active_session_ids(height: BlockNumberFor<T>) -> Vec<SessionId> {
		ActiveSessionIds::<T>::get(height)
	}

	/// No-op when the session is already in the bucket.
	pub(crate) fn add_session_to_active_list(height: BlockNumberFor<T>, id: SessionId) {
		ActiveSessionIds::<T>::mutate(height, |ids| {
			if let Err(index) = ids.binary_search(&id) {
				ids.insert(index, id);
			}
		});
	}

	/// No-op when the session is not in the bucket. Empty buckets are dropped.
	pub(crate) fn remove_session_from_active_list(height: BlockNumberFor<T>, id: SessionId) {
		ActiveSessionIds::<T>::mutate_exists(height, |maybe_ids| {
			let Some(ids) = maybe_ids else { return };
			if let Ok(index) = ids.binary_search(&id) {
				ids.remove(index);
			}
			if ids.is_empty() {
				*maybe_ids = None;
			}
		});
	}

	/// Moves a session from the bucket of its previous report, if any, to `to`. Every
	/// change of an active session's `status_modified_at` goes through here.
	pub(crate) fn relocate_session(
		from: Option<BlockNumberFor<T>>,
		to: BlockNumberFor<T>,
		id: SessionId,
	) {
		if let Some(from) = from.filter(|from| *from != to) {
			Self::remove_session_from_active_list(from, id);
		}
		Self::add_session_to_active_list(to, id);
	}

	pub(crate) fn delete_active_session_ids(height: BlockNumberFor<T>) {
		ActiveSessionIds::<T>::remove(height);
	}
}
