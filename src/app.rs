//! Wires adapters and controllers together according to an [AppConfig].

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    AppConfig, Backend, Container, Error, Outcome,
    adapter::{InMemoryAdapter, ServiceAdapter, SqliteAdapter, create_entity_table},
    alert::{LogNotifier, Notifier},
    controller::{
        BudgetController, CategoryController, Controller, GoalController, InvestmentController,
        TransactionController, UserController,
    },
    models::{
        Budget, Category, Entity, Goal, Investment, InvestmentReturn, NewUser, Transaction, User,
    },
};

/// The name the [AppConfig] is registered under.
pub const CONFIG: &str = "config";
/// The name the shared [Notifier] is registered under.
pub const NOTIFIER: &str = "notifier";
/// The name the [CategoryController] is registered under.
pub const CATEGORY_CONTROLLER: &str = "categoryController";
/// The name the [TransactionController] is registered under.
pub const TRANSACTION_CONTROLLER: &str = "transactionController";
/// The name the [BudgetController] is registered under.
pub const BUDGET_CONTROLLER: &str = "budgetController";
/// The name the [GoalController] is registered under.
pub const GOAL_CONTROLLER: &str = "goalController";
/// The name the [InvestmentController] is registered under.
pub const INVESTMENT_CONTROLLER: &str = "investmentController";
/// The name the [UserController] is registered under.
pub const USER_CONTROLLER: &str = "userController";

/// The name the adapter for `E` is registered under, e.g. "adapter.categories".
pub fn adapter_name<E: Entity>() -> String {
    format!("adapter.{}", E::COLLECTION)
}

/// Register the configuration, a logging notifier, one adapter per collection
/// and one controller per entity.
///
/// Every registered service is shared: resolving a name twice gives the same `Arc`.
///
/// # Errors
/// Returns an error if the SQLite database cannot be opened or set up.
pub fn build_container(config: &AppConfig) -> Result<Container, Error> {
    let mut container = Container::new();

    let shared_config = config.clone();
    container.register(CONFIG, move || shared_config.clone());

    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    container.register(NOTIFIER, move || notifier.clone());

    match &config.backend {
        Backend::Memory => {
            tracing::info!("keeping records in memory");
            register_adapters(&mut container, &InMemoryBackend);
        }
        Backend::Sqlite(path) => {
            tracing::info!("keeping records in the SQLite database at {path:?}");
            let connection = Connection::open(path)?;
            create_entity_table(&connection)?;

            let backend = SqliteBackend(Arc::new(Mutex::new(connection)));
            register_adapters(&mut container, &backend);
        }
    }

    register_controllers(&mut container, config)?;

    Ok(container)
}

/// Creates one adapter per collection.
trait AdapterSource {
    fn adapter<E: Entity>(&self) -> Arc<dyn ServiceAdapter<E>>;
}

struct InMemoryBackend;

impl AdapterSource for InMemoryBackend {
    fn adapter<E: Entity>(&self) -> Arc<dyn ServiceAdapter<E>> {
        Arc::new(InMemoryAdapter::<E>::new())
    }
}

struct SqliteBackend(Arc<Mutex<Connection>>);

impl AdapterSource for SqliteBackend {
    fn adapter<E: Entity>(&self) -> Arc<dyn ServiceAdapter<E>> {
        Arc::new(SqliteAdapter::<E>::new(self.0.clone()))
    }
}

fn register_adapters(container: &mut Container, source: &impl AdapterSource) {
    register_adapter::<Category>(container, source);
    register_adapter::<Transaction>(container, source);
    register_adapter::<Budget>(container, source);
    register_adapter::<Goal>(container, source);
    register_adapter::<Investment>(container, source);
    register_adapter::<InvestmentReturn>(container, source);
    register_adapter::<User>(container, source);
}

fn register_adapter<E: Entity>(container: &mut Container, source: &impl AdapterSource) {
    let adapter = source.adapter::<E>();
    container.register(adapter_name::<E>(), move || adapter.clone());
}

fn resolve_adapter<E: Entity>(container: &Container) -> Result<Arc<dyn ServiceAdapter<E>>, Error> {
    container.resolve(&adapter_name::<E>())
}

fn register_shared<T: Send + Sync + 'static>(container: &mut Container, name: &str, value: T) {
    let value = Arc::new(value);
    container.register(name, move || value.clone());
}

fn register_controllers(container: &mut Container, config: &AppConfig) -> Result<(), Error> {
    let notifier: Arc<dyn Notifier> = container.resolve(NOTIFIER)?;

    let categories = CategoryController::new(
        resolve_adapter::<Category>(container)?,
        notifier.clone(),
        config.variant,
    );
    let transactions: TransactionController =
        Controller::new(resolve_adapter(container)?, notifier.clone());
    let budgets: BudgetController = Controller::new(resolve_adapter(container)?, notifier.clone());
    let goals: GoalController = Controller::new(resolve_adapter(container)?, notifier.clone());
    let investments = InvestmentController::new(
        resolve_adapter(container)?,
        resolve_adapter(container)?,
        notifier.clone(),
    );
    let users: UserController = Controller::new(resolve_adapter(container)?, notifier);

    register_shared(container, CATEGORY_CONTROLLER, categories);
    register_shared(container, TRANSACTION_CONTROLLER, transactions);
    register_shared(container, BUDGET_CONTROLLER, budgets);
    register_shared(container, GOAL_CONTROLLER, goals);
    register_shared(container, INVESTMENT_CONTROLLER, investments);
    register_shared(container, USER_CONTROLLER, users);

    Ok(())
}

/// The controllers of a wired up application.
#[derive(Clone)]
pub struct App {
    /// The configuration the application was built from.
    pub config: AppConfig,
    /// Manages categories.
    pub categories: Arc<CategoryController>,
    /// Manages transactions.
    pub transactions: Arc<TransactionController>,
    /// Manages budgets.
    pub budgets: Arc<BudgetController>,
    /// Manages goals.
    pub goals: Arc<GoalController>,
    /// Manages investments and their returns.
    pub investments: Arc<InvestmentController>,
    /// Manages user profiles.
    pub users: Arc<UserController>,
}

impl App {
    /// Build the container for `config` and resolve the controllers from it.
    ///
    /// # Errors
    /// Returns an error if the container cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        Self::from_container(&build_container(config)?)
    }

    /// Resolve the controllers from a container set up by [build_container].
    ///
    /// # Errors
    /// Returns [Error::DependencyNotFound] or [Error::DependencyTypeMismatch]
    /// if the container is missing a service or holds one of the wrong type.
    pub fn from_container(container: &Container) -> Result<Self, Error> {
        Ok(Self {
            config: container.resolve(CONFIG)?,
            categories: container.resolve(CATEGORY_CONTROLLER)?,
            transactions: container.resolve(TRANSACTION_CONTROLLER)?,
            budgets: container.resolve(BUDGET_CONTROLLER)?,
            goals: container.resolve(GOAL_CONTROLLER)?,
            investments: container.resolve(INVESTMENT_CONTROLLER)?,
            users: container.resolve(USER_CONTROLLER)?,
        })
    }

    /// Run the start-up steps of the configured variant, i.e. seed the
    /// default categories where the variant has them.
    pub async fn bootstrap(&self) {
        if self.config.variant.seeds_default_categories() {
            let categories = self.categories.seed_defaults().await;
            tracing::info!("{} categories available after bootstrap", categories.len());
        }
    }

    /// Create a user, falling back to the configured currency when the draft has none.
    pub async fn create_user(&self, mut draft: NewUser) -> Outcome<User> {
        if draft.currency.is_none() {
            draft.currency = Some(self.config.currency.clone());
        }

        self.users.create(draft).await
    }
}
