//! StableSwap Curve Property Tests
//!
//! Mathematical properties that must hold for any realistic pool, regardless
//! of the specific reserves, amplification or fee.
//!
//! Pools are generated with 12-decimal assets whose reserves stay within two
//! orders of magnitude of each other, and share supplies well below the
//! invariant, which is the regime the rounding guarantees are stated for.

use proptest::prelude::*;
use stableswap_amm::{
    calculate_amplification, AssetAmount, AssetReserve, Amplification, Balance, FeeRate,
    InvariantSolver, PoolBalances, ShareCalculator, StableSwapError, SwapCalculator,
};

const DECIMALS: u8 = 12;

#[derive(Debug, Clone)]
struct PoolCase {
    reserves: Vec<u128>,
    amplification: u32,
}

impl PoolCase {
    fn balances(&self) -> PoolBalances {
        PoolBalances::new(
            self.reserves
                .iter()
                .enumerate()
                .map(|(id, &amount)| AssetReserve::new(id as u32, amount, DECIMALS))
                .collect(),
        )
        .expect("generated pool is valid")
    }

    fn amp(&self) -> Amplification {
        Amplification::new(self.amplification).expect("generated amplification is positive")
    }
}

// Property test strategies
prop_compose! {
    fn valid_amplification()
        (amp in prop::sample::select(vec![1u32, 10, 100, 1_000, 10_000])) -> u32 {
        amp
    }
}

prop_compose! {
    /// Reserves in `[10^base, 10^(base+2))`, rounded to multiples of 1000 so
    /// proportional deposits divide evenly
    fn realistic_pool()
        (n_assets in 2usize..=5, base in 6u32..=18, amp in valid_amplification())
        (
            reserves in prop::collection::vec(
                10u128.pow(base - 3)..10u128.pow(base - 1),
                n_assets,
            ),
            amplification in Just(amp),
        ) -> PoolCase {
        PoolCase {
            reserves: reserves.into_iter().map(|r| r * 1_000).collect(),
            amplification,
        }
    }
}

prop_compose! {
    fn valid_fee()
        (ppm in 0u32..1_000_000) -> FeeRate {
        FeeRate::from_ppm(ppm).expect("ppm below denominator")
    }
}

prop_compose! {
    fn share_supply()
        (total in 1_000_000u128..=1_000_000_000_000) -> Balance {
        Balance::from(total)
    }
}

fn b(value: u128) -> Balance {
    Balance::from(value)
}

proptest! {
    /// Property: Raising any single balance strictly raises D
    #[test]
    fn invariant_is_monotonic_in_each_balance(
        pool in realistic_pool(),
        index_seed in any::<prop::sample::Index>(),
        bump in 1u128..=1_000_000_000_000,
    ) {
        let solver = InvariantSolver::default();
        let xp = pool.balances().normalized().unwrap();
        let d = solver.compute_d(&xp, &pool.amp()).unwrap();

        let index = index_seed.index(xp.len());
        let mut raised = xp.clone();
        raised[index] += b(bump) * b(1_000_000);
        let d_raised = solver.compute_d(&raised, &pool.amp()).unwrap();

        prop_assert!(d_raised > d, "D did not grow: {} -> {}", d, d_raised);
    }

    /// Property: Swapping nothing yields nothing
    #[test]
    fn zero_input_swap_returns_zero(
        pool in realistic_pool(),
        fee in valid_fee(),
    ) {
        let outcome = SwapCalculator::default()
            .calculate_out_given_in(&pool.balances(), &pool.amp(), 0, 1, &b(0), fee)
            .unwrap();
        prop_assert_eq!(outcome.amount, b(0));
        prop_assert_eq!(outcome.fee, b(0));
    }

    /// Property: A fee-free A -> B -> A round trip never returns more than it started with
    #[test]
    fn round_trip_never_profits(
        pool in realistic_pool(),
        fraction in 1u128..=1_000,
    ) {
        let calc = SwapCalculator::default();
        let amount_in = (pool.reserves[0] * fraction / 1_000).max(1);

        let out = calc
            .calculate_out_given_in(&pool.balances(), &pool.amp(), 0, 1, &b(amount_in), FeeRate::ZERO)
            .unwrap()
            .amount;
        prop_assume!(out > b(0));

        let mut after = pool.clone();
        after.reserves[0] += amount_in;
        after.reserves[1] -= u128::try_from(&out).unwrap();

        let back = calc
            .calculate_out_given_in(&after.balances(), &after.amp(), 1, 0, &out, FeeRate::ZERO)
            .unwrap()
            .amount;
        prop_assert!(back <= b(amount_in), "round trip {} -> {} -> {}", amount_in, out, back);
    }

    /// Property: Paying the exact-output quote buys the requested output, less
    /// the one unit an exact-input quote withholds
    #[test]
    fn exact_output_quote_covers_request(
        pool in realistic_pool(),
        fraction in 1u128..=500,
        fee_ppm in 0u32..=10_000,
    ) {
        let calc = SwapCalculator::default();
        let fee = FeeRate::from_ppm(fee_ppm).unwrap();
        let wanted = (pool.reserves[1] * fraction / 1_000).max(1);

        let required = calc
            .calculate_in_given_out(&pool.balances(), &pool.amp(), 0, 1, &b(wanted), fee)
            .unwrap()
            .amount;
        let received = calc
            .calculate_out_given_in(&pool.balances(), &pool.amp(), 0, 1, &required, fee)
            .unwrap()
            .amount;

        prop_assert!(
            &received + 1u32 >= b(wanted),
            "paid {} for {} but received {}",
            required,
            wanted,
            received
        );
    }

    /// Property: A proportional deposit mints its share of supply and pays no imbalance fee
    #[test]
    fn proportional_deposit_mints_pro_rata(
        pool in realistic_pool(),
        per_mille in 1u128..=1_000,
        total in share_supply(),
        fee in valid_fee(),
    ) {
        let calc = ShareCalculator::default();
        let deposits: Vec<AssetAmount> = pool
            .reserves
            .iter()
            .enumerate()
            .map(|(id, &r)| AssetAmount::new(id as u32, r / 1_000 * per_mille))
            .collect();

        let free = calc
            .calculate_shares(&pool.balances(), &deposits, &pool.amp(), &total, FeeRate::ZERO)
            .unwrap();
        let charged = calc
            .calculate_shares(&pool.balances(), &deposits, &pool.amp(), &total, fee)
            .unwrap();

        let expected = &total * b(per_mille) / b(1_000);
        let error = if free > expected { &free - &expected } else { &expected - &free };
        prop_assert!(error <= b(1), "minted {} expected {}", free, expected);
        prop_assert_eq!(free, charged);
    }

    /// Property: The first deposit mints exactly the resulting invariant, whatever the fee
    #[test]
    fn bootstrap_mints_invariant(
        pool in realistic_pool(),
        fee in valid_fee(),
    ) {
        let empty = PoolBalances::new(
            (0..pool.reserves.len())
                .map(|id| AssetReserve::new(id as u32, 0u32, DECIMALS))
                .collect(),
        )
        .unwrap();
        let deposits: Vec<AssetAmount> = pool
            .reserves
            .iter()
            .enumerate()
            .map(|(id, &r)| AssetAmount::new(id as u32, r))
            .collect();

        let shares = ShareCalculator::default()
            .calculate_shares(&empty, &deposits, &pool.amp(), &b(0), fee)
            .unwrap();
        let d = InvariantSolver::default()
            .compute_d(&pool.balances().normalized().unwrap(), &pool.amp())
            .unwrap();
        prop_assert_eq!(shares, d);
    }

    /// Property: Withdrawing with a fee never burns fewer shares than without
    #[test]
    fn withdrawal_fee_never_discounts(
        pool in realistic_pool(),
        fraction in 1u128..=500,
        total in share_supply(),
        fee in valid_fee(),
    ) {
        let calc = ShareCalculator::default();
        let amount = b((pool.reserves[0] * fraction / 1_000).max(1));

        let free = calc
            .calculate_shares_for_amount(&pool.balances(), 0, &amount, &pool.amp(), &total, FeeRate::ZERO);
        let charged = calc
            .calculate_shares_for_amount(&pool.balances(), 0, &amount, &pool.amp(), &total, fee);

        match (free, charged) {
            (Ok(free), Ok(charged)) => prop_assert!(charged >= free),
            // Tiny withdrawals can round to no change in D
            (Err(StableSwapError::InvalidAmount { .. }), _) => {}
            (free, charged) => prop_assert!(false, "unexpected {:?} / {:?}", free, charged),
        }
    }

    /// Property: Both solvers converge within the iteration cap for balances up to 10^30
    #[test]
    fn solvers_converge_across_magnitudes(
        balances in prop::collection::vec((0u32..=29).prop_flat_map(|exp| {
            10u128.pow(exp)..=10u128.pow(30)
        }), 2..=5),
        amplification in prop::sample::select(vec![1u32, 10, 100, 1_000, 10_000, 100_000]),
        target_seed in any::<prop::sample::Index>(),
    ) {
        let solver = InvariantSolver::default();
        let amp = Amplification::new(amplification).unwrap();
        let xp: Vec<Balance> = balances.into_iter().map(Balance::from).collect();

        let d = solver.compute_d(&xp, &amp).unwrap();
        let target = target_seed.index(xp.len());
        solver.compute_balance(&xp, target, &d, &amp).unwrap();
    }

    /// Property: The amplification ramp is monotone and clamps at both ends
    #[test]
    fn ramp_is_monotone_and_clamped(
        initial in 1u64..100_000,
        final_amp in 1u64..100_000,
        start in 0u64..1_000_000,
        duration in 1u64..1_000_000,
        first in 0u64..3_000_000,
        second in 0u64..3_000_000,
    ) {
        let (initial, final_amp) = (Balance::from(initial), Balance::from(final_amp));
        let end = start + duration;
        let (early, late) = (first.min(second), first.max(second));

        let a_early = calculate_amplification(&initial, &final_amp, start, end, early);
        let a_late = calculate_amplification(&initial, &final_amp, start, end, late);

        if final_amp >= initial {
            prop_assert!(a_early <= a_late);
        } else {
            prop_assert!(a_early >= a_late);
        }
        let (low, high) = if initial <= final_amp { (&initial, &final_amp) } else { (&final_amp, &initial) };
        prop_assert!(&a_early >= low && &a_early <= high);
        prop_assert_eq!(calculate_amplification(&initial, &final_amp, start, end, end), final_amp.clone());
        if start > 0 {
            prop_assert_eq!(calculate_amplification(&initial, &final_amp, start, end, start - 1), initial.clone());
        }
    }
}
