use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;
use time::macros::date;

use finboard::{
    App, AppConfig, Backend, Variant,
    logging::setup_logging,
    models::{
        BudgetPeriod, CategoryType, NewBudget, NewCategory, NewGoal, NewInvestment,
        NewInvestmentReturn, NewTransaction, NewUser, TransactionType,
    },
    summary::summarize_transactions,
};

/// A utility for creating a demo database for finboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: PathBuf,

    /// The product variant to seed the database for: personal, mei or diarista.
    #[arg(long, short, env = "FINBOARD_VARIANT", default_value = "mei")]
    variant: Variant,

    /// The `tracing` filter directives.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_filter: String,
}

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(&args.log_filter)?;

    check_output_path(&args.output_path);

    println!("Creating database at {:#?}", args.output_path);
    let app = App::new(&AppConfig {
        variant: args.variant,
        backend: Backend::Sqlite(args.output_path.clone()),
        log_filter: args.log_filter.clone(),
        ..Default::default()
    })?;

    app.bootstrap().await;

    println!("Creating demo records...");
    let created = insert_demo_records(&app).await;

    let transactions = app.transactions.list().await;
    let summary = summarize_transactions(&transactions);
    println!(
        "Created {created} records, balance of {} {:.2} over {} transactions.",
        app.config.currency, summary.balance, summary.transaction_count
    );

    println!("Success!");

    Ok(())
}

fn check_output_path(output_path: &Path) {
    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }
}

/// Insert a handful of records of every kind, returning how many were created.
async fn insert_demo_records(app: &App) -> usize {
    let mut created = 0;

    let user = app
        .create_user(NewUser {
            name: "Demo".to_owned(),
            email: "demo@example.com".to_owned(),
            phone: Some("+55 11 99999-0000".to_owned()),
            photo_url: None,
            currency: None,
        })
        .await;
    created += usize::from(user.is_success());

    let income = match app.categories.list().await.first() {
        Some(category) => category.id.clone(),
        None => match app
            .categories
            .create(NewCategory::new("Salary", CategoryType::Income))
            .await
            .into_data()
        {
            Some(category) => category.id,
            None => return created,
        },
    };
    let expense = match app
        .categories
        .create(NewCategory::new("Groceries", CategoryType::Expense))
        .await
        .into_data()
    {
        Some(category) => category.id,
        None => return created,
    };

    let transactions = [
        ("Invoice #1", 3200.0, TransactionType::Income, &income, date!(2025 - 01 - 05)),
        ("Market", 245.9, TransactionType::Expense, &expense, date!(2025 - 01 - 12)),
        ("Invoice #2", 2800.0, TransactionType::Income, &income, date!(2025 - 02 - 05)),
        ("Market", 310.4, TransactionType::Expense, &expense, date!(2025 - 02 - 14)),
    ];
    for (description, amount, transaction_type, category_id, date) in transactions {
        let outcome = app
            .transactions
            .create(NewTransaction {
                description: description.to_owned(),
                amount,
                transaction_type,
                category_id: category_id.clone(),
                date,
            })
            .await;
        created += usize::from(outcome.is_success());
    }

    let budget = app
        .budgets
        .create(NewBudget {
            name: "Groceries".to_owned(),
            amount: 600.0,
            category_id: expense.clone(),
            period: BudgetPeriod::Monthly,
            description: None,
        })
        .await;
    created += usize::from(budget.is_success());

    let goal = app
        .goals
        .create(NewGoal {
            name: "Emergency fund".to_owned(),
            target_amount: 10_000.0,
            current_amount: Some(1500.0),
            start_date: date!(2025 - 01 - 01),
            target_date: date!(2025 - 12 - 31),
            description: Some("Six months of expenses".to_owned()),
        })
        .await;
    created += usize::from(goal.is_success());

    let investment = app
        .investments
        .create(NewInvestment {
            name: "Treasury bonds".to_owned(),
            amount: 5000.0,
            category_id: income.clone(),
            description: None,
        })
        .await
        .into_data();
    if let Some(investment) = investment {
        created += 1;

        let investment_return = app
            .investments
            .add_investment_return(NewInvestmentReturn {
                investment_id: investment.id,
                amount: 48.7,
                date: date!(2025 - 02 - 28),
            })
            .await;
        created += usize::from(investment_return.is_success());
    }

    created
}
