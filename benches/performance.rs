use bilancio_core::classify::ProviderRegistry;
use bilancio_core::domain::{Bill, BillKind, Dataset, Expense, Invoice, PaymentMethod};
use bilancio_core::forecast::{monthly_forecast, ForecastOptions, Profile};
use bilancio_core::storage::json_backend::{load_dataset_from_path, save_dataset_to_path};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;
use uuid::Uuid;

fn build_sample_dataset(expense_count: usize) -> Dataset {
    let mut dataset = Dataset::new("Benchmark");
    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    for idx in 0..12 {
        let due = start_date + Duration::days(idx * 30);
        let mut invoice = Invoice::new(due - Duration::days(30), due, 2500.0).sent();
        if idx % 2 == 0 {
            invoice.mark_paid(due + Duration::days(5));
        }
        dataset.add_invoice(invoice);
    }

    for idx in 0..expense_count {
        let date = start_date + Duration::days((idx % 365) as i64);
        let method = match idx % 4 {
            0 => PaymentMethod::Bancomat,
            1 => PaymentMethod::CartaCredito,
            2 => PaymentMethod::Bonifico,
            _ => PaymentMethod::Contanti,
        };
        let mut expense = Expense::new(
            format!("Spesa {idx}"),
            20.0 + (idx % 100) as f64,
            date,
            method,
        );
        if idx % 10 == 0 {
            expense = expense.with_bill(
                Bill::new(BillKind::Luce, "Enel")
                    .with_period(date - Duration::days(60), date)
                    .paid(date),
            );
        }
        dataset.add_expense(expense);
    }

    dataset
}

fn bench_dataset_io(c: &mut Criterion) {
    let dataset = build_sample_dataset(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("dataset.json");

    c.bench_function("dataset_save_10k", |b| {
        b.iter(|| {
            save_dataset_to_path(&dataset, &file_path).expect("save dataset");
        })
    });

    save_dataset_to_path(&dataset, &file_path).expect("seed");

    c.bench_function("dataset_load_10k", |b| {
        b.iter(|| {
            let loaded = load_dataset_from_path(&file_path).expect("load dataset");
            black_box(loaded);
        })
    });
}

fn bench_forecast(c: &mut Criterion) {
    let dataset = build_sample_dataset(black_box(10_000));
    let registry = ProviderRegistry::default();
    let options = ForecastOptions::new(Profile::Primary {
        user_id: Uuid::new_v4(),
    });
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    c.bench_function("monthly_forecast_10k", |b| {
        b.iter(|| {
            let result = monthly_forecast(
                &dataset.invoices,
                &dataset.expenses,
                &dataset.transfers,
                &registry,
                &options,
                today,
            );
            black_box(result);
        })
    });
}

criterion_group!(benches, bench_dataset_io, bench_forecast);
criterion_main!(benches);
