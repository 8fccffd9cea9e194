//! Money math shared by `end_session` and the end-of-block sweep.

use crate::types::{Bandwidth, Coin};
use sp_arithmetic::{PerThing, Perbill};

/// Bytes in one billing gigabyte.
pub const GB: u64 = 1_000_000_000;

/// Bandwidth a deposit buys at `price` per GB, split evenly between upload and
/// download. `None` when the denoms differ, the price is zero or the result
/// does not fit.
pub fn deposit_to_bandwidth(deposit: &Coin, price: &Coin) -> Option<Bandwidth> {
	if deposit.denom != price.denom || price.is_zero() {
		return None;
	}

	let half_gb = (GB / 2) as u128;
	let side = deposit.amount.checked_mul(half_gb)? / price.amount;
	let side = u64::try_from(side).ok()?;

	Some(Bandwidth::new(side, side))
}

/// Granularity bandwidth is billed in: the bytes one smallest coin unit buys.
pub fn bandwidth_precision(price: &Coin) -> u64 {
	let amount = u64::try_from(price.amount).unwrap_or(u64::MAX);
	(GB / amount.max(1)).max(1)
}

/// Total reported bytes rounded up to a whole number of billing units.
pub fn billable_bytes(reported: &Bandwidth, price: &Coin) -> u128 {
	let precision = bandwidth_precision(price) as u128;
	reported.sum().div_ceil(precision).saturating_mul(precision)
}

/// `bytes * price / GB`, truncated.
pub fn amount_due(bytes: u128, price: &Coin) -> u128 {
	bytes.saturating_mul(price.amount) / GB as u128
}

/// Splits `amount` into the resolver's commission and the node owner's share.
pub fn split_commission(commission: Perbill, amount: u128) -> (u128, u128) {
	let to_resolver = commission.mul_floor(amount);
	(to_resolver, amount - to_resolver)
}

/// Outcome of billing one session period.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Settlement {
	/// Bytes charged for, after rounding up.
	pub billed_bytes: u128,
	pub pay: u128,
	pub to_resolver: u128,
	pub to_node: u128,
}

impl Settlement {
	pub fn is_free(&self) -> bool {
		self.pay == 0
	}
}

/// Bills `reported` usage. Free clients pay nothing and the charge never
/// exceeds what is still escrowed for the subscription.
pub fn settle(
	reported: &Bandwidth,
	price: &Coin,
	remaining_deposit: u128,
	commission: Perbill,
	free_client: bool,
) -> Settlement {
	let billed_bytes = billable_bytes(reported, price);
	let pay = if free_client { 0 } else { amount_due(billed_bytes, price).min(remaining_deposit) };
	let (to_resolver, to_node) = split_commission(commission, pay);

	Settlement { billed_bytes, pay, to_resolver, to_node }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn stake(amount: u128) -> Coin {
		Coin::new(b"stake", amount)
	}

	#[test]
	fn deposit_equal_to_price_buys_one_gb() {
		let bw = deposit_to_bandwidth(&stake(100), &stake(100)).unwrap();
		assert_eq!(bw, Bandwidth::new(GB / 2, GB / 2));
		assert_eq!(bw.sum(), GB as u128);
	}

	#[test]
	fn deposit_conversion_rejects_foreign_denom_and_zero_price() {
		assert_eq!(deposit_to_bandwidth(&Coin::new(b"atom", 100), &stake(100)), None);
		assert_eq!(deposit_to_bandwidth(&stake(100), &stake(0)), None);
	}

	#[test]
	fn deposit_conversion_truncates() {
		// 10 units at 3 per GB
		let bw = deposit_to_bandwidth(&stake(10), &stake(3)).unwrap();
		assert_eq!(bw.upload, 1_666_666_666);
		assert_eq!(bw.download, 1_666_666_666);
	}

	#[test]
	fn partial_unit_is_billed_as_a_full_unit() {
		let price = stake(100);
		// one unit is 10 MB at 100 per GB
		assert_eq!(bandwidth_precision(&price), 10_000_000);

		let billed = billable_bytes(&Bandwidth::new(1, 1), &price);
		assert_eq!(billed, 10_000_000);
		assert_eq!(amount_due(billed, &price), 1);

		let billed = billable_bytes(&Bandwidth::new(5_000_000, 5_000_001), &price);
		assert_eq!(billed, 20_000_000);
		assert_eq!(amount_due(billed, &price), 2);
	}

	#[test]
	fn whole_units_are_billed_exactly() {
		let price = stake(100);
		let reported = Bandwidth::new(GB / 2, GB / 2);
		let billed = billable_bytes(&reported, &price);

		assert_eq!(billed, reported.sum());
		assert_eq!(amount_due(billed, &price), 100);
	}

	#[test]
	fn price_above_gb_bills_per_byte() {
		let price = stake(2 * GB as u128);
		assert_eq!(bandwidth_precision(&price), 1);
		assert_eq!(billable_bytes(&Bandwidth::new(2, 1), &price), 3);
		assert_eq!(amount_due(3, &price), 6);
	}

	#[test]
	fn commission_split_sums_to_amount() {
		for amount in [0u128, 1, 7, 99, 100, 12_345] {
			let (r, n) = split_commission(Perbill::from_percent(20), amount);
			assert_eq!(r + n, amount);
			assert_eq!(r, Perbill::from_percent(20).mul_floor(amount));
		}

		assert_eq!(split_commission(Perbill::from_percent(20), 100), (20, 80));
		assert_eq!(split_commission(Perbill::from_percent(33), 10), (3, 7));
		assert_eq!(split_commission(Perbill::zero(), 10), (0, 10));
		assert_eq!(split_commission(Perbill::one(), 10), (10, 0));
	}

	#[test]
	fn free_clients_pay_nothing_but_still_consume() {
		let s = settle(&Bandwidth::new(1, 1), &stake(100), 100, Perbill::from_percent(20), true);
		assert!(s.is_free());
		assert_eq!(s.billed_bytes, 10_000_000);
		assert_eq!((s.to_resolver, s.to_node), (0, 0));
	}

	#[test]
	fn pay_is_clamped_to_remaining_deposit() {
		let s = settle(&Bandwidth::new(GB, GB), &stake(100), 30, Perbill::zero(), false);
		assert_eq!(s.pay, 30);
		assert_eq!(s.to_node, 30);
	}
}
