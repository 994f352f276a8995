use chrono::NaiveDate;
use sea_orm::Database;

use engine::{
    AttendanceKind, AttendanceMarking, Category, Engine, Money, Month, NewRecord, RecordKind,
    RecordStore,
};
use migration::MigratorTrait;

async fn fresh_engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> Month {
    Month::new(y, m).unwrap()
}

async fn add(engine: &Engine, kind: RecordKind, on: NaiveDate, amount: i64, category: Category) {
    engine
        .insert(kind, NewRecord {
            date: on,
            description: format!("{} {amount}", category.label()),
            amount: Money::new(amount),
            category,
        })
        .await
        .unwrap();
}

async fn seeded() -> Engine {
    let engine = fresh_engine().await;
    add(&engine, RecordKind::Expense, date(2025, 3, 10), 1_000_000, Category::Food).await;
    add(&engine, RecordKind::Expense, date(2025, 4, 1), 600_000, Category::Food).await;
    add(&engine, RecordKind::Expense, date(2025, 4, 1), 300_000, Category::Transport).await;
    add(&engine, RecordKind::Expense, date(2025, 4, 30), 600_000, Category::Shopping).await;
    add(&engine, RecordKind::Income, date(2025, 4, 5), 10_000_000, Category::Salary).await;
    add(&engine, RecordKind::Expense, date(2025, 5, 1), 99_000, Category::Food).await;
    engine
}

#[tokio::test]
async fn expense_stats_for_april() {
    let engine = seeded().await;
    let stats = engine.expense_stats(month(2025, 4)).await.unwrap();

    assert_eq!(stats.total, Money::new(1_500_000));
    assert_eq!(stats.previous_total, Money::new(1_000_000));
    assert!((stats.change - 50.0).abs() < 1e-9);
    assert!((stats.daily_average - 50_000.0).abs() < 1e-9);
    assert_eq!(stats.transaction_count, 3);
    assert_eq!(stats.peak_day.date, Some(date(2025, 4, 1)));
    assert_eq!(stats.peak_day.amount, Money::new(900_000));
}

#[tokio::test]
async fn history_spans_the_window() {
    let engine = seeded().await;
    let history = engine.monthly_history(month(2025, 4), 3).await.unwrap();

    let months: Vec<Month> = history.rows.iter().map(|r| r.summary.month).collect();
    assert_eq!(months, vec![month(2025, 2), month(2025, 3), month(2025, 4)]);
    assert_eq!(history.rows[1].summary.total_expenses, Money::new(1_000_000));
    assert_eq!(history.rows[2].summary.balance, Money::new(8_500_000));
    assert!((history.rows[2].expense_change - 50.0).abs() < 1e-9);
    assert_eq!(history.total_expenses, Money::new(2_500_000));
    assert_eq!(history.total_balance, Money::new(7_500_000));

    let empty = engine.monthly_history(month(2025, 4), 0).await.unwrap();
    assert!(empty.rows.is_empty());
}

#[tokio::test]
async fn month_detail_and_calendar() {
    let engine = seeded().await;

    let detail = engine.month_detail(month(2025, 4)).await.unwrap();
    assert_eq!(detail.expenses.len(), 3);
    assert_eq!(detail.expenses[0].date, date(2025, 4, 30));
    assert_eq!(detail.incomes.len(), 1);
    // Shopping and Food tie; Shopping is met first in newest-first order.
    assert_eq!(detail.expense_breakdown[0].category, Category::Shopping);
    assert_eq!(detail.expense_breakdown[1].category, Category::Food);
    assert_eq!(detail.expense_breakdown[2].category, Category::Transport);

    let calendar = engine.expense_calendar(month(2025, 4)).await.unwrap();
    assert_eq!(calendar.len(), 2);
    assert_eq!(calendar[&date(2025, 4, 1)], Money::new(900_000));

    let day = engine.expenses_on(date(2025, 4, 1)).await.unwrap();
    assert_eq!(day.len(), 2);
}

#[tokio::test]
async fn salary_from_stored_attendance() {
    let engine = fresh_engine().await;
    for (d, kind) in [(1, AttendanceKind::FullDay), (2, AttendanceKind::HalfDay)] {
        engine
            .upsert_attendance(AttendanceMarking::new(date(2025, 4, d), kind).unwrap())
            .await
            .unwrap();
    }
    engine
        .upsert_attendance(AttendanceMarking::new(date(2025, 5, 2), AttendanceKind::FullDay).unwrap())
        .await
        .unwrap();

    let estimate = engine
        .salary_estimate(month(2025, 4), Money::new(10_000_000))
        .await
        .unwrap();
    assert_eq!(estimate.working_days, 26);
    assert_eq!(estimate.worked_units, 1.5);
    assert!((estimate.estimated_salary - 576_923.076_923).abs() < 1e-3);
}
