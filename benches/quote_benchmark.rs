use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{thread_rng, Rng};
use rust_decimal::Decimal;
use stay_quote_engine::catalog::{Catalog, HotelInfo, MultiplierRow, RateRow};
use stay_quote_engine::config::EngineConfig;
use stay_quote_engine::guests::GuestGroup;
use stay_quote_engine::multipliers::AgeInterval;
use stay_quote_engine::partition::PartitionGenerator;
use stay_quote_engine::quote::{QuoteEngine, QuoteRequest};

// Partition enumeration grows quickly with the party, so bench a few sizes
pub fn partition_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_enumeration");

    for (adults, children) in [(2, 1), (3, 2), (4, 3), (5, 4)] {
        let party = GuestGroup::new(adults, (0..children).map(|i| 2 + i * 3).collect());
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}A{}C", adults, children)),
            &party,
            |b, party| {
                let generator = PartitionGenerator::new(None);
                b.iter(|| black_box(generator.enumerate(black_box(party))));
            },
        );
    }

    group.finish();
}

fn synthetic_catalog(hotels: u32) -> Catalog {
    let start = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
    let end = chrono::NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default();
    let mut rng = thread_rng();

    let mut rates = Vec::new();
    let mut multipliers = Vec::new();
    let mut infos = Vec::new();

    for hotel_id in 1..=hotels {
        let hotel_name = format!("Hotel {}", hotel_id);
        for room_type in ["Standard", "Family"] {
            for rate_plan in ["Her Şey Dahil", "Oda Kahvaltı"] {
                rates.push(RateRow {
                    hotel_id,
                    hotel_name: hotel_name.clone(),
                    room_type: room_type.to_string(),
                    period_start: start,
                    period_end: end,
                    rate_plan: rate_plan.to_string(),
                    nightly_price: Decimal::from(rng.gen_range(1000..9000)),
                    currency: "TL".to_string(),
                });
            }

            for adults in 1..=3 {
                for children in 0..=2u32 {
                    multipliers.push(MultiplierRow {
                        hotel_id,
                        hotel_name: hotel_name.clone(),
                        room_type: room_type.to_string(),
                        adults,
                        children,
                        child_age_ranges: (0..children).map(|_| AgeInterval::parse("0-11,99")).collect(),
                        factor: Decimal::new(rng.gen_range(60..200), 2),
                    });
                }
            }
        }

        infos.push(HotelInfo {
            hotel_id,
            hotel_name,
            location: "Antalya".to_string(),
        });
    }

    Catalog::new(rates, multipliers, infos).unwrap_or_default()
}

pub fn quote_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_quote");
    let config = EngineConfig::default();

    for hotels in [1, 10, 50] {
        let catalog = synthetic_catalog(hotels);
        let request = QuoteRequest {
            checkin: "2025-07-01".to_string(),
            checkout: "2025-07-08".to_string(),
            adults: 4,
            children: 2,
            child_ages: vec![4, 9],
            hotel_id: None,
        };

        group.bench_with_input(BenchmarkId::from_parameter(hotels), &request, |b, request| {
            let engine = QuoteEngine::new(&catalog, &config);
            b.iter(|| black_box(engine.quote(black_box(request))));
        });
    }

    group.finish();
}

criterion_group!(benches, partition_benchmark, quote_benchmark);
criterion_main!(benches);
