//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Centavo - Track expenses from bank SMS notifications
#[derive(Parser)]
#[command(name = "centavo")]
#[command(about = "SMS-driven expense tracker with goals", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file path (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process a bank SMS into a stored expense
    Sms {
        /// Sender number as it arrived
        #[arg(short, long)]
        sender: String,

        /// Message body
        body: String,
    },

    /// Show the monthly dashboard (totals, day groups, goal progress)
    Dashboard {
        /// Month 1-12 (defaults to current)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to current)
        #[arg(short, long)]
        year: Option<i32>,

        /// Sort order: date-desc, date-asc, value-desc, value-asc,
        /// name-asc, name-desc (establishment name), category-asc, category-desc
        #[arg(long, default_value = "date-desc")]
        sort: String,
    },

    /// Manage monthly goals
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Manage expenses
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage subcategories
    Subcategories {
        #[command(subcommand)]
        action: Option<SubcategoriesAction>,
    },

    /// Manage settings (allowed SMS sender)
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// LLM backend utilities
    Llm {
        #[command(subcommand)]
        action: LlmAction,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// Show goal progress for a month (default)
    List {
        /// Month 1-12 (defaults to current)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to current)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Create a goal for a category and month
    Add {
        /// Category name
        category: String,

        /// Goal amount (e.g. 800.00)
        amount: String,

        /// Month 1-12 (defaults to current)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to current)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Change a goal's amount
    Update {
        /// Goal id
        id: String,

        /// New goal amount
        amount: String,
    },

    /// Delete a goal
    Delete {
        /// Goal id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses for a month (default)
    List {
        /// Month 1-12 (defaults to current)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to current)
        #[arg(short, long)]
        year: Option<i32>,

        /// Sort order (see dashboard --sort)
        #[arg(long, default_value = "date-desc")]
        sort: String,
    },

    /// Show one expense
    Show {
        /// Expense id
        id: String,
    },

    /// Add an expense by hand
    Add {
        /// Amount (e.g. 42.90)
        amount: String,

        /// Category name
        #[arg(short, long)]
        category: String,

        /// Subcategory name within the category
        #[arg(short, long)]
        subcategory: String,

        /// Date YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Establishment / location
        #[arg(short, long)]
        location: Option<String>,

        /// Free-form detail
        #[arg(long)]
        detail: Option<String>,
    },

    /// Update fields of an expense
    Update {
        /// Expense id
        id: String,

        /// New amount
        #[arg(long)]
        amount: Option<String>,

        /// New date YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,

        /// New location
        #[arg(long)]
        location: Option<String>,

        /// New status: approved, pending, rejected
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories with their subcategories (default)
    List,

    /// Create a category
    Add {
        /// Category name
        name: String,
    },

    /// Rename a category
    Rename {
        /// Current name
        name: String,
        /// New name
        new_name: String,
    },

    /// Delete a category
    Delete {
        /// Category name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum SubcategoriesAction {
    /// List subcategories, optionally scoped to a category (default)
    List {
        /// Category name
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Create a subcategory under a category
    Add {
        /// Category name
        category: String,
        /// Subcategory name
        name: String,
    },

    /// Rename a subcategory
    Rename {
        /// Category name
        category: String,
        /// Current name
        name: String,
        /// New name
        new_name: String,
    },

    /// Delete a subcategory
    Delete {
        /// Category name
        category: String,
        /// Subcategory name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show,

    /// Set the only SMS sender the pipeline accepts
    SetSender {
        /// Sender number (punctuation is ignored)
        number: String,
    },

    /// Accept messages from any sender
    ClearSender,
}

#[derive(Subcommand)]
pub enum LlmAction {
    /// Check the configured backend and run a sample extraction
    Test {
        /// Sample SMS to extract (health check only when omitted)
        #[arg(long)]
        sms: Option<String>,

        /// Override the configured model for this run
        #[arg(short, long)]
        model: Option<String>,
    },
}
