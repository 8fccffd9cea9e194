use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_arithmetic::Perbill;
use sp_runtime::RuntimeDebug;
use sp_std::prelude::*;

/// Longest moniker a node may carry.
pub const MAX_MONIKER_LENGTH: usize = 128;

/// Smallest registration deposit the params may require.
pub const MIN_DEPOSIT_AMOUNT: u128 = 100;

macro_rules! sequential_id {
	($(#[$attr:meta])* $name:ident) => {
		$(#[$attr])*
		#[derive(
			Encode,
			Decode,
			Clone,
			Copy,
			PartialEq,
			Eq,
			PartialOrd,
			Ord,
			Default,
			RuntimeDebug,
			TypeInfo,
			MaxEncodedLen,
		)]
		pub struct $name(pub u64);

		impl $name {
			pub const fn new(value: u64) -> Self {
				Self(value)
			}

			pub const fn value(&self) -> u64 {
				self.0
			}

			/// Fixed-width big-endian form, ordered the same way as the id.
			pub fn to_be_bytes(&self) -> [u8; 8] {
				self.0.to_be_bytes()
			}
		}

		impl From<u64> for $name {
			fn from(value: u64) -> Self {
				Self(value)
			}
		}
	};
}

sequential_id!(
	/// Id of a VPN node, allocated from `NodesCount`.
	NodeId
);
sequential_id!(
	/// Id of a subscription, allocated from `SubscriptionsCount`.
	SubscriptionId
);
sequential_id!(
	/// Id of a session, allocated from `SessionsCount`.
	SessionId
);
sequential_id!(
	/// Id of a resolver, allocated from `ResolversCount`.
	ResolverId
);

/// An amount of a single denomination.
#[derive(Encode, Decode, Clone, Eq, PartialEq, Default, RuntimeDebug, TypeInfo)]
pub struct Coin {
	pub denom: Vec<u8>,
	pub amount: u128,
}

impl Coin {
	pub fn new(denom: &[u8], amount: u128) -> Self {
		Self { denom: denom.to_vec(), amount }
	}

	/// Zero of the same denomination.
	pub fn zero_of(denom: &[u8]) -> Self {
		Self::new(denom, 0)
	}

	pub fn is_positive(&self) -> bool {
		self.amount > 0
	}

	pub fn is_zero(&self) -> bool {
		self.amount == 0
	}

	/// `[a-z][a-z0-9]{2,15}`
	pub fn is_valid_denom(denom: &[u8]) -> bool {
		match denom.split_first() {
			Some((first, rest)) =>
				(3..=16).contains(&denom.len()) &&
					first.is_ascii_lowercase() &&
					rest.iter().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
			None => false,
		}
	}

	pub fn is_valid(&self) -> bool {
		Self::is_valid_denom(&self.denom)
	}

	pub fn with_amount(&self, amount: u128) -> Self {
		Self { denom: self.denom.clone(), amount }
	}
}

/// A coin list is valid when every entry is positive with a valid denom and the
/// denoms are strictly ascending.
pub fn coins_are_valid(coins: &[Coin]) -> bool {
	coins.iter().all(|c| c.is_valid() && c.is_positive()) &&
		coins.windows(2).all(|w| w[0].denom < w[1].denom)
}

/// Upload and download byte counts.
#[derive(
	Encode, Decode, Clone, Copy, Eq, PartialEq, Default, RuntimeDebug, TypeInfo, MaxEncodedLen,
)]
pub struct Bandwidth {
	pub upload: u64,
	pub download: u64,
}

impl Bandwidth {
	pub const fn new(upload: u64, download: u64) -> Self {
		Self { upload, download }
	}

	pub fn is_all_positive(&self) -> bool {
		self.upload > 0 && self.download > 0
	}

	pub fn is_any_zero(&self) -> bool {
		self.upload == 0 || self.download == 0
	}

	pub fn sum(&self) -> u128 {
		self.upload as u128 + self.download as u128
	}

	/// True when neither component exceeds the other's.
	pub fn all_lte(&self, other: &Bandwidth) -> bool {
		self.upload <= other.upload && self.download <= other.download
	}

	pub fn saturating_sub(&self, other: &Bandwidth) -> Bandwidth {
		Bandwidth {
			upload: self.upload.saturating_sub(other.upload),
			download: self.download.saturating_sub(other.download),
		}
	}
}

#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum NodeStatus {
	Registered,
	Inactive,
	DeRegistered,
}

#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum ResolverStatus {
	Registered,
	DeRegistered,
}

#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum SubscriptionStatus {
	Active,
	Inactive,
}

#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum SessionStatus {
	Active,
	Inactive,
}

/// A VPN server and its advertised terms.
#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct Node<AccountId, BlockNumber> {
	pub id: NodeId,
	pub owner: AccountId,
	/// Collateral posted at registration, zero while the owner is within the free quota.
	pub deposit: Coin,
	pub node_type: Vec<u8>,
	pub version: Vec<u8>,
	pub moniker: Vec<u8>,
	pub prices_per_gb: Vec<Coin>,
	pub internet_speed: Bandwidth,
	pub encryption: Vec<u8>,
	pub status: NodeStatus,
	pub status_modified_at: BlockNumber,
}

impl<AccountId, BlockNumber> Node<AccountId, BlockNumber> {
	/// Price entry for `denom`, if the node accepts it.
	pub fn price_of(&self, denom: &[u8]) -> Option<&Coin> {
		self.prices_per_gb.iter().find(|p| p.denom == denom)
	}
}

/// Fields of a node that `update_node_info` may overwrite. Empty byte strings,
/// `None` prices and zero speed components keep the stored value.
#[derive(Encode, Decode, Clone, Eq, PartialEq, Default, RuntimeDebug, TypeInfo)]
pub struct NodeInfoUpdate {
	pub node_type: Vec<u8>,
	pub version: Vec<u8>,
	pub moniker: Vec<u8>,
	pub prices_per_gb: Option<Vec<Coin>>,
	pub internet_speed: Bandwidth,
	pub encryption: Vec<u8>,
}

impl<AccountId, BlockNumber> Node<AccountId, BlockNumber> {
	pub fn apply_update(&mut self, update: NodeInfoUpdate) {
		if !update.node_type.is_empty() {
			self.node_type = update.node_type;
		}
		if !update.version.is_empty() {
			self.version = update.version;
		}
		if !update.moniker.is_empty() {
			self.moniker = update.moniker;
		}
		if let Some(prices) = update.prices_per_gb {
			self.prices_per_gb = prices;
		}
		if update.internet_speed.upload > 0 {
			self.internet_speed.upload = update.internet_speed.upload;
		}
		if update.internet_speed.download > 0 {
			self.internet_speed.download = update.internet_speed.download;
		}
		if !update.encryption.is_empty() {
			self.encryption = update.encryption;
		}
	}
}

/// A broker that vouches for nodes and takes a commission on their sessions.
#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct Resolver<AccountId, BlockNumber> {
	pub id: ResolverId,
	pub owner: AccountId,
	pub commission: Perbill,
	pub status: ResolverStatus,
	pub status_modified_at: BlockNumber,
}

#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct Subscription<AccountId, BlockNumber> {
	pub id: SubscriptionId,
	pub resolver_id: ResolverId,
	pub node_id: NodeId,
	pub client: AccountId,
	pub price_per_gb: Coin,
	pub total_deposit: Coin,
	pub remaining_deposit: Coin,
	pub remaining_bandwidth: Bandwidth,
	/// Whether the client was a free client of the node when subscribing. Free
	/// subscriptions escrow nothing and are never charged.
	pub free_client: bool,
	pub status: SubscriptionStatus,
	pub status_modified_at: BlockNumber,
}

#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct Session<BlockNumber> {
	pub id: SessionId,
	pub subscription_id: SubscriptionId,
	/// Cumulative usage reported for the current period.
	pub bandwidth: Bandwidth,
	pub status: SessionStatus,
	pub status_modified_at: BlockNumber,
}

#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct FreeClient<AccountId> {
	pub node_id: NodeId,
	pub client: AccountId,
}

/// One party's proof over a bandwidth report.
#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct BandwidthSignature<Signer, Signature> {
	pub signer: Signer,
	pub signature: Signature,
}

/// Payload both the client and the node owner sign. Its SCALE encoding is the
/// message handed to signature verification.
#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct BandwidthSignatureData {
	pub subscription_id: SubscriptionId,
	pub session_index: u64,
	pub bandwidth: Bandwidth,
}

impl BandwidthSignatureData {
	pub fn new(subscription_id: SubscriptionId, session_index: u64, bandwidth: Bandwidth) -> Self {
		Self { subscription_id, session_index, bandwidth }
	}

	pub fn to_sign_bytes(&self) -> Vec<u8> {
		self.encode()
	}
}

#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct VpnParams<BlockNumber> {
	/// Nodes an owner may register before a deposit is required.
	pub free_nodes_count: u64,
	pub deposit: Coin,
	/// Blocks without a bandwidth report after which a session is settled.
	pub session_inactive_interval: BlockNumber,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_order_like_their_big_endian_bytes() {
		let a = SessionId::new(255);
		let b = SessionId::new(256);
		assert!(a < b);
		assert!(a.to_be_bytes() < b.to_be_bytes());
		assert_eq!(NodeId::new(1).to_be_bytes(), [0, 0, 0, 0, 0, 0, 0, 1]);
	}

	#[test]
	fn denom_rules() {
		assert!(Coin::is_valid_denom(b"stake"));
		assert!(Coin::is_valid_denom(b"u4tom"));
		assert!(!Coin::is_valid_denom(b"st"));
		assert!(!Coin::is_valid_denom(b"Stake"));
		assert!(!Coin::is_valid_denom(b"1stake"));
		assert!(!Coin::is_valid_denom(b""));
		assert!(!Coin::is_valid_denom(b"abcdefghijklmnopq"));
	}

	#[test]
	fn coin_lists_must_be_sorted_unique_and_positive() {
		let good = vec![Coin::new(b"atom", 10), Coin::new(b"stake", 100)];
		assert!(coins_are_valid(&good));

		let unsorted = vec![Coin::new(b"stake", 100), Coin::new(b"atom", 10)];
		assert!(!coins_are_valid(&unsorted));

		let duplicate = vec![Coin::new(b"stake", 100), Coin::new(b"stake", 10)];
		assert!(!coins_are_valid(&duplicate));

		let zero = vec![Coin::new(b"stake", 0)];
		assert!(!coins_are_valid(&zero));
	}

	#[test]
	fn bandwidth_comparisons_are_per_side() {
		let limit = Bandwidth::new(10, 10);
		assert!(Bandwidth::new(10, 3).all_lte(&limit));
		assert!(!Bandwidth::new(11, 3).all_lte(&limit));
		assert_eq!(limit.saturating_sub(&Bandwidth::new(4, 12)), Bandwidth::new(6, 0));
		assert!(Bandwidth::new(0, 5).is_any_zero());
		assert!(!Bandwidth::new(0, 5).is_all_positive());
	}

	#[test]
	fn apply_update_keeps_absent_fields() {
		let mut node = Node::<u64, u64> {
			id: NodeId::new(0),
			owner: 1,
			deposit: Coin::zero_of(b"stake"),
			node_type: b"OpenVPN".to_vec(),
			version: b"0.1".to_vec(),
			moniker: b"alpha".to_vec(),
			prices_per_gb: vec![Coin::new(b"stake", 100)],
			internet_speed: Bandwidth::new(10, 20),
			encryption: b"AES-256".to_vec(),
			status: NodeStatus::Registered,
			status_modified_at: 1,
		};

		node.apply_update(NodeInfoUpdate {
			moniker: b"beta".to_vec(),
			internet_speed: Bandwidth::new(0, 50),
			..Default::default()
		});

		assert_eq!(node.moniker, b"beta".to_vec());
		assert_eq!(node.node_type, b"OpenVPN".to_vec());
		assert_eq!(node.internet_speed, Bandwidth::new(10, 50));
		assert_eq!(node.prices_per_gb, vec![Coin::new(b"stake", 100)]);
	}
}
