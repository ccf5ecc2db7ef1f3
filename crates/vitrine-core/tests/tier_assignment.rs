//! End-to-end checks of the tier assignment rules.

use vitrine_core::prelude::*;

fn category_list(n: usize, base_price: f64) -> Vec<Advertisement> {
    (0..n)
        .map(|i| Advertisement::new(format!("ad-{i:03}"), Category::Mulheres, Some(base_price)))
        .collect()
}

fn count(ads: &[Advertisement], tier: Tier) -> usize {
    ads.iter().filter(|a| a.tier == Some(tier)).count()
}

#[test]
fn quota_invariant_holds_for_every_length() {
    for n in 0..=120 {
        let out = assign_tiers(&category_list(n, 300.0)).unwrap();
        let n1 = n.min(29);
        let n3 = (n - n1).min(15);

        assert_eq!(out.len(), n);
        assert_eq!(count(&out, Tier::N1), n1, "n1 for n={n}");
        assert_eq!(count(&out, Tier::N3), n3, "n3 for n={n}");
        assert_eq!(count(&out, Tier::N7), n - n1 - n3, "n7 for n={n}");
    }
}

#[test]
fn boundary_scenarios() {
    let cases = [(0, 0, 0, 0), (10, 10, 0, 0), (35, 29, 6, 0), (50, 29, 15, 6)];
    for (n, n1, n3, n7) in cases {
        let out = assign_tiers(&category_list(n, 300.0)).unwrap();
        let dist = TierDistribution::from_ads(&out);
        assert_eq!((dist.n1, dist.n3, dist.n7), (n1, n3, n7), "n={n}");
        assert!(dist.is_fully_assigned());
    }
}

#[test]
fn premium_prices_from_300() {
    let out = assign_tiers(&category_list(1, 300.0)).unwrap();
    let prices = out[0].prices().unwrap();

    assert_eq!(out[0].tier, Some(Tier::N1));
    assert_eq!(prices.price_per_hour, Price::new(600));
    assert_eq!(prices.price_30_min, Price::new(360));
    assert_eq!(prices.price_45_min, Price::new(480));
    assert_eq!(prices.price_1_hour, Price::new(600));
}

#[test]
fn negative_base_price_is_rejected() {
    let mut ads = category_list(3, 300.0);
    ads[0].base_price = Some(-5.0);
    assert!(matches!(
        assign_tiers(&ads),
        Err(InvalidInputError::NegativePrice { .. })
    ));
}

#[test]
fn large_base_prices_keep_the_rounding_law() {
    let out = assign_tiers(&category_list(1, 1e18)).unwrap();
    let prices = out[0].prices().unwrap();

    assert_eq!(prices.price_per_hour.units(), 2_000_000_000_000_000_000);
    assert_eq!(prices.price_30_min.units(), 1_200_000_000_000_000_000);
    assert_eq!(prices.price_45_min.units(), 1_600_000_000_000_000_000);
}

#[test]
fn base_price_past_the_price_range_is_rejected() {
    // 5e18 fits as N7 (x1.0) but not as N1 (x2.0).
    let mut ads = category_list(2, 300.0);
    ads[0].base_price = Some(5e18);
    let err = assign_tiers(&ads).unwrap_err();
    assert_eq!(
        err,
        InvalidInputError::PriceOutOfRange {
            ad_id: AdId::new("ad-000"),
            price: 5e18,
            multiplier: 2.0,
        }
    );

    let engine = TierEngine::new(TierConfig {
        n1: TierSpec::new(Some(0), "Premium VIP", 2.0),
        n3: TierSpec::new(Some(0), "Destaque", 1.5),
        n7: TierSpec::new(None, "Padrão", 1.0),
    });
    let out = engine.assign_tiers(&ads).unwrap();
    assert_eq!(out[0].price_per_hour, Some(Price::new(5_000_000_000_000_000_000)));
}

#[test]
fn order_is_preserved() {
    let ads = category_list(60, 120.0);
    let out = assign_tiers(&ads).unwrap();
    let in_ids: Vec<&AdId> = ads.iter().map(|a| &a.id).collect();
    let out_ids: Vec<&AdId> = out.iter().map(|a| &a.id).collect();
    assert_eq!(in_ids, out_ids);
}

#[test]
fn assignment_is_deterministic() {
    let ads: Vec<Advertisement> = (0..70)
        .map(|i| {
            Advertisement::new(format!("ad-{i}"), Category::Trans, Some(100.0 + i as f64 * 7.3))
        })
        .collect();
    assert_eq!(assign_tiers(&ads).unwrap(), assign_tiers(&ads).unwrap());
}

#[test]
fn reapplying_to_output_is_stable() {
    let first = assign_tiers(&category_list(50, 275.0)).unwrap();
    let second = assign_tiers(&first).unwrap();
    assert_eq!(first, second);
}

#[test]
fn premium_never_cheaper_than_standard() {
    for base in [0.0, 1.0, 99.5, 300.0, 1234.56] {
        let out = assign_tiers(&category_list(50, base)).unwrap();
        let premium = out[0].price_per_hour.unwrap();
        let standard = out[49].price_per_hour.unwrap();
        assert_eq!(out[49].tier, Some(Tier::N7));
        assert!(premium >= standard, "base {base}");
    }
}

#[test]
fn rounding_law_holds_for_every_record() {
    let ads: Vec<Advertisement> = (0..200)
        .map(|i| Advertisement::new(format!("ad-{i}"), Category::Homens, Some(i as f64 * 3.7)))
        .collect();

    for ad in assign_tiers(&ads).unwrap() {
        let hourly = ad.price_per_hour.unwrap().units();
        assert_eq!(ad.price_1_hour.unwrap().units(), hourly);
        assert_eq!(
            ad.price_30_min.unwrap().units(),
            (hourly as f64 * 0.6).floor() as i64
        );
        assert_eq!(
            ad.price_45_min.unwrap().units(),
            (hourly as f64 * 0.8).floor() as i64
        );
    }
}

#[test]
fn multiplier_applied_before_truncation() {
    // N3 slot: 29 premium records ahead of it.
    let mut ads = category_list(30, 300.0);
    ads[29].base_price = Some(100.5);
    let out = assign_tiers(&ads).unwrap();
    assert_eq!(out[29].tier, Some(Tier::N3));
    // floor(100.5 * 1.5) = floor(150.75) = 150, not floor(100) * 1.5
    assert_eq!(out[29].price_per_hour, Some(Price::new(150)));
}

#[test]
fn custom_configuration() {
    let config = TierConfig {
        n1: TierSpec::new(Some(2), "Ouro", 3.0),
        n3: TierSpec::new(Some(1), "Prata", 2.0),
        n7: TierSpec::new(None, "Bronze", 1.0),
    };
    config.validate().unwrap();

    let out = TierEngine::new(config)
        .assign_tiers(&category_list(5, 100.0))
        .unwrap();
    let labels: Vec<&str> = out.iter().map(|a| a.tier_label.as_deref().unwrap()).collect();
    assert_eq!(labels, vec!["Ouro", "Ouro", "Prata", "Bronze", "Bronze"]);
    assert_eq!(out[0].price_per_hour, Some(Price::new(300)));
    assert_eq!(out[2].price_per_hour, Some(Price::new(200)));
}

#[test]
fn catalog_run_partitions_and_keeps_priority() {
    let mut ads = Vec::new();
    for i in 0..40 {
        let category = if i % 2 == 0 { Category::Mulheres } else { Category::Massagistas };
        ads.push(Advertisement::new(format!("ad-{i:02}"), category, Some(300.0)));
    }

    let run = assign_catalog(&TierEngine::default(), ads);
    assert_eq!(run.skipped().count(), 0);

    let tiered = run.into_ads();
    let mulheres: Vec<&Advertisement> = tiered
        .iter()
        .filter(|a| a.category == Category::Mulheres)
        .collect();
    assert_eq!(mulheres.len(), 20);
    assert_eq!(mulheres[0].id.as_str(), "ad-00");
    assert_eq!(mulheres[19].id.as_str(), "ad-38");
    assert!(mulheres.iter().all(|a| a.tier == Some(Tier::N1)));
}
