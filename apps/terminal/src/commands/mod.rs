//! # Terminal Commands Module
//!
//! Every operator command, its parser and the dispatcher.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (parse + dispatch)
//! ├── auth.rs     ◄─── login, logout, staff
//! ├── product.rs  ◄─── products
//! ├── cart.rs     ◄─── add, qty, rm, type, table, customer, cart, clear
//! ├── payment.rs  ◄─── pay, method, next, back, doc, confirm, cancel
//! └── report.rs   ◄─── history, report
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  > method cash 15000                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command::parse (clap) ──► Command::Method { method: "cash",            │
//! │                                              tendered: Some("15000") }  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Terminal::execute ──► payment::select_method(&session, ...)            │
//! │         │                       │                                       │
//! │         │                       ▼                                       │
//! │         │              Result<CheckoutResponse, ApiError>               │
//! │         ▼                                                               │
//! │  view::checkout(...) ──► text printed to the operator                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command function declares only the state it needs:
//! ```rust,ignore
//! // Only needs the catalog
//! fn search_products(catalog: &Catalog, ...)
//!
//! // Only needs the session
//! fn get_cart(session: &SessionState)
//!
//! // Needs both
//! fn add_to_cart(catalog: &Catalog, session: &SessionState, ...)
//! ```

pub mod auth;
pub mod cart;
pub mod payment;
pub mod product;
pub mod report;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use lomi_core::{Catalog, StaffDirectory};

use crate::error::ApiError;
use crate::state::{ConfigState, SalesLog, SessionState};
use crate::view;
use cart::AddRequest;

// =============================================================================
// Parsing
// =============================================================================

/// One input line: the verb is the first word, as in a multicall binary.
#[derive(Debug, Parser)]
#[command(name = "lomi", multicall = true)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

/// One operator command.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Log in as a staff member
    Login { email: String, password: String },

    /// Log out
    Logout,

    /// List staff accounts
    Staff,

    /// List products, best sellers when no filter is given
    #[command(alias = "menu")]
    Products {
        /// Optional category, then search text
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Add a product to the cart
    Add {
        product_id: String,

        /// Extra ids, `-`exclusion ids, then `# note`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        modifiers: Vec<String>,
    },

    /// Set the quantity of a cart line, 0 removes it
    #[command(name = "qty")]
    Quantity {
        /// Line number as shown by `cart`
        line: usize,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a cart line
    #[command(name = "rm")]
    Remove {
        /// Line number as shown by `cart`
        line: usize,
    },

    /// Set the order type
    #[command(name = "type")]
    OrderType {
        /// dine_in, takeaway or delivery
        tag: String,
    },

    /// Set the dine-in table, 0 clears it
    Table { table: u32 },

    /// Set the customer
    Customer {
        /// <name>;<phone>;[address]
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        fields: Vec<String>,
    },

    /// Show the cart
    Cart,

    /// Empty the cart
    Clear,

    /// Start checkout
    Pay,

    /// Choose the payment method
    Method {
        /// cash, card or transfer
        method: String,

        /// Cash received
        #[arg(allow_hyphen_values = true)]
        tendered: Option<String>,
    },

    /// Continue to the document
    Next,

    /// Return to the payment step
    Back,

    /// Choose the document
    #[command(name = "doc")]
    Document {
        /// receipt, invoice or both
        document: String,

        /// <name>;<tax-id>
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        billing: Vec<String>,
    },

    /// Complete the order
    Confirm,

    /// Abandon checkout, keep the cart
    Cancel,

    /// Orders and kitchen queue
    History,

    /// Totals by payment method
    Report,

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines parse to `None`.
    ///
    /// `help` and `help <command>` come back as a
    /// [`ErrorKind::DisplayHelp`] error carrying the rendered text.
    ///
    /// ## Example
    /// ```rust
    /// use lomi_terminal::commands::Command;
    ///
    /// let cmd = Command::parse("qty 2 3").unwrap();
    /// assert_eq!(cmd, Some(Command::Quantity { line: 2, quantity: 3 }));
    /// ```
    pub fn parse(line: &str) -> Result<Option<Command>, clap::Error> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }
        CommandLine::try_parse_from(words).map(|cli| Some(cli.command))
    }
}

/// `add` modifiers: `extra-a,extra-b -excl-a,-excl-b # note`.
fn add_request(product_id: String, modifiers: &[String]) -> AddRequest {
    let (ids, notes) = match modifiers.iter().position(|w| w.starts_with('#')) {
        Some(at) => {
            let note = modifiers[at..].join(" ");
            (&modifiers[..at], Some(note.trim_start_matches('#').trim().to_string()))
        }
        None => (modifiers, None),
    };

    let mut request = AddRequest {
        product_id,
        notes,
        ..AddRequest::default()
    };
    for word in ids {
        let (target, list) = match word.strip_prefix('-') {
            Some(list) => (&mut request.exclusion_ids, list),
            None => (&mut request.extra_ids, word.as_str()),
        };
        target.extend(
            list.split(',')
                .map(|id| id.trim().trim_start_matches('-'))
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        );
    }
    request
}

/// Rejoins trailing words and splits them on `;`.
fn semicolon_fields(words: &[String]) -> Vec<String> {
    words
        .join(" ")
        .split(';')
        .map(|field| field.trim().to_string())
        .collect()
}

fn usage(syntax: &str) -> ApiError {
    ApiError::usage(format!("Usage: {}", syntax))
}

// =============================================================================
// Dispatch
// =============================================================================

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to show the operator.
    Text(String),
    /// End the session.
    Quit,
}

/// All terminal state, handed out to command functions piecemeal.
#[derive(Debug)]
pub struct Terminal {
    pub config: ConfigState,
    pub catalog: Catalog,
    pub staff: StaffDirectory,
    pub session: SessionState,
    pub sales: SalesLog,
}

impl Terminal {
    pub fn new(config: ConfigState, catalog: Catalog, staff: StaffDirectory) -> Self {
        let session = SessionState::new(config.pricing());
        Terminal {
            config,
            catalog,
            staff,
            session,
            sales: SalesLog::new(),
        }
    }

    /// Parses and runs one input line.
    pub fn handle_line(&self, line: &str) -> Result<Reply, ApiError> {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Ok(Reply::Text(String::new())),
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                Ok(Reply::Text(e.to_string().trim_end().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn execute(&self, command: Command) -> Result<Reply, ApiError> {
        let config = &self.config;
        let session = &self.session;

        let text = match command {
            Command::Login { email, password } => {
                let user = auth::login(&self.staff, session, &email, &password)?;
                format!("Welcome, {}", user.name)
            }
            Command::Logout => match auth::logout(session) {
                Some(user) => format!("Goodbye, {}", user.name),
                None => "Nobody is logged in".to_string(),
            },
            Command::Staff => view::staff(&auth::list_staff(&self.staff)),
            Command::Products { words } => {
                let products = if words.is_empty() {
                    product::best_sellers(&self.catalog)
                } else {
                    let words: Vec<&str> = words.iter().map(String::as_str).collect();
                    product::search_products(&self.catalog, &words)?
                };
                view::products(&products, config)
            }
            Command::Add {
                product_id,
                modifiers,
            } => {
                let request = add_request(product_id, &modifiers);
                view::cart(&cart::add_to_cart(&self.catalog, session, &request)?, config)
            }
            Command::Quantity { line, quantity } => {
                view::cart(&cart::update_quantity(session, line, quantity)?, config)
            }
            Command::Remove { line } => view::cart(&cart::remove_from_cart(session, line)?, config),
            Command::OrderType { tag } => view::cart(&cart::set_order_type(session, &tag)?, config),
            Command::Table { table } => view::cart(&cart::set_table(config, session, table)?, config),
            Command::Customer { fields } => {
                let (name, phone, address) = match semicolon_fields(&fields).as_slice() {
                    [name, phone] => (name.clone(), phone.clone(), None),
                    [name, phone, address] => {
                        (name.clone(), phone.clone(), Some(address.clone()).filter(|a| !a.is_empty()))
                    }
                    _ => return Err(usage("customer <name>;<phone>;[address]")),
                };
                view::cart(
                    &cart::set_customer(session, &name, &phone, address.as_deref())?,
                    config,
                )
            }
            Command::Cart => view::cart(&cart::get_cart(session), config),
            Command::Clear => view::cart(&cart::clear_cart(session)?, config),
            Command::Pay => view::checkout(&payment::start_payment(session)?, config),
            Command::Method { method, tendered } => view::checkout(
                &payment::select_method(session, &method, tendered.as_deref())?,
                config,
            ),
            Command::Next => view::checkout(&payment::submit_payment(session)?, config),
            Command::Back => view::checkout(&payment::go_back(session)?, config),
            Command::Document { document, billing } => {
                let billing = if billing.is_empty() {
                    None
                } else {
                    match semicolon_fields(&billing).as_slice() {
                        [name, tax_id] => Some((name.clone(), tax_id.clone())),
                        _ => return Err(usage("doc <receipt|invoice|both> [name;tax-id]")),
                    }
                };
                let billing = billing
                    .as_ref()
                    .map(|(name, tax_id)| (name.as_str(), tax_id.as_str()));
                view::checkout(
                    &payment::select_document(session, &document, billing)?,
                    config,
                )
            }
            Command::Confirm => {
                view::receipt(&payment::confirm_payment(session, &self.sales)?, config)
            }
            Command::Cancel => {
                payment::cancel_payment(session)?;
                "Payment cancelled, cart kept".to_string()
            }
            Command::History => view::history(
                &report::order_history(&self.sales),
                &report::kitchen_queue(&self.sales),
                config,
            ),
            Command::Report => view::report(&report::sales_report(&self.sales), config),
            Command::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Text(text))
    }
}
