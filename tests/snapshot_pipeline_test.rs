use hyperstats::{
    Address, AssetId, BlockRef, Category, EngineConfig, MockChainState, PoolConfig, PoolError,
    PoolId, PoolInfo, RewardableTotals, SnapshotPipeline,
};
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}

fn wad(units: u64) -> BigUint {
    BigUint::from(units) * BigUint::from(10u64).pow(18)
}

fn healthy_config() -> PoolConfig {
    PoolConfig {
        initial_vault_share_price: wad(1),
        time_stretch: wad(1),
        position_duration: 31_536_000,
    }
}

fn healthy_info() -> PoolInfo {
    PoolInfo {
        share_reserves: wad(1_000),
        share_adjustment: BigInt::from(0),
        bond_reserves: wad(2_000),
        shorts_outstanding: BigUint::from(300u64),
    }
}

fn lp_id() -> AssetId {
    AssetId::encode(0, &BigUint::zero())
}

fn short_id() -> AssetId {
    AssetId::encode(2, &BigUint::from(1_700_000_000u64))
}

fn long_id() -> AssetId {
    AssetId::encode(1, &BigUint::from(1_700_000_000u64))
}

/// One healthy pool: two LPs (one with dust), one short, one long.
fn healthy_pool(pool: &PoolId) -> MockChainState {
    let alice = Address::new("0xalice");
    let bob = Address::new("0xbob");
    let totals = RewardableTotals::from_vault_shares(&BigUint::from(1_000u64), &BigUint::from(300u64))
        .unwrap();
    MockChainState::new()
        .with_pool(pool.clone(), healthy_config(), healthy_info(), totals)
        .with_holder(pool, alice.clone())
        .with_holder(pool, bob.clone())
        .with_asset_id(pool, lp_id())
        .with_asset_id(pool, short_id())
        .with_asset_id(pool, long_id())
        .with_balance(pool, &lp_id(), &alice, BigUint::from(400u64))
        .with_balance(pool, &lp_id(), &bob, BigUint::from(1u64)) // dust
        .with_balance(pool, &short_id(), &bob, BigUint::from(60u64))
        .with_balance(pool, &long_id(), &alice, BigUint::from(75u64))
}

fn pipeline(mock: MockChainState) -> SnapshotPipeline<MockChainState, MockChainState, MockChainState> {
    SnapshotPipeline::new(mock.clone(), mock.clone(), mock, EngineConfig::default())
}

#[tokio::test]
async fn test_compute_pool_end_to_end() -> anyhow::Result<()> {
    init_tracing();
    let pool = PoolId::new("0xpool");
    let pipeline = pipeline(healthy_pool(&pool));

    let report = pipeline.compute_pool(&pool, BlockRef::Number(123)).await?;

    // Bob's 1-wei LP dust is filtered; three positions remain.
    assert_eq!(report.rows.len(), 3);
    assert!(report
        .rows
        .iter()
        .all(|r| r.holder.as_str() != "0xbob" || r.category != Category::Lp));

    // Alice is the only LP, so she takes all 700; Bob the only short: 300.
    let lp_row = report
        .rows
        .iter()
        .find(|r| r.category == Category::Lp)
        .unwrap();
    assert_eq!(lp_row.share, BigUint::from(700u64));
    let short_row = report
        .rows
        .iter()
        .find(|r| r.category == Category::Short)
        .unwrap();
    assert_eq!(short_row.share, BigUint::from(300u64));
    let long_row = report
        .rows
        .iter()
        .find(|r| r.category == Category::Long)
        .unwrap();
    assert!(long_row.share.is_zero());

    assert_eq!(report.total_share, BigUint::from(1_000u64));
    // time stretch 1, ratio 0.5, one-year term: rate is exactly 1
    let rate = report.annualized_rate.clone().expect("pipeline computes a rate");
    let tolerance = hyperstats::Dec::from_str_canonical("1e-50")?;
    assert!((rate - hyperstats::Dec::one()).abs() < tolerance);
    Ok(())
}

#[tokio::test]
async fn test_dust_threshold_is_configurable() {
    let pool = PoolId::new("0xpool");
    let mock = healthy_pool(&pool);
    let config = EngineConfig {
        dust_threshold: BigUint::zero(),
    };
    let pipeline = SnapshotPipeline::new(mock.clone(), mock.clone(), mock, config);

    let positions = pipeline
        .load_positions(&pool, BlockRef::Latest)
        .await
        .unwrap();
    // threshold 0 admits Bob's 1-wei balance
    assert_eq!(positions.len(), 4);
}

#[tokio::test]
async fn test_degenerate_pool_does_not_sink_the_run() {
    init_tracing();
    let good = PoolId::new("0xgood");
    let broken = PoolId::new("0xbroken");

    let degenerate_info = PoolInfo {
        share_reserves: wad(1_000),
        share_adjustment: BigInt::from(0),
        bond_reserves: BigUint::zero(),
        shorts_outstanding: BigUint::zero(),
    };
    let mock = healthy_pool(&good).with_pool(
        broken.clone(),
        healthy_config(),
        degenerate_info,
        RewardableTotals::new(BigUint::zero(), BigUint::zero()),
    );
    let pipeline = pipeline(mock);

    let outcome = pipeline
        .compute_pools(&[good.clone(), broken.clone()], BlockRef::Latest)
        .await;

    assert_eq!(outcome.reports.len(), 1);
    assert_eq!(outcome.reports[0].pool, good);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].0, broken);
    assert!(matches!(outcome.failures[0].1, PoolError::Rate(_)));
}

#[tokio::test]
async fn test_unknown_pool_is_a_state_failure() {
    let pipeline = pipeline(MockChainState::new());
    let err = pipeline
        .compute_pool(&PoolId::new("0xmissing"), BlockRef::Latest)
        .await
        .unwrap_err();
    assert!(matches!(err, PoolError::State(_)));
}
