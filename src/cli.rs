use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::payments::{PaymentMode, PaymentTerm};

#[derive(Parser, Debug)]
#[command(name = "feedesk")]
#[command(about = "School fee desk: students, fee structures and payments")]
pub struct Cli {
    /// Backend base URL (overrides FEEDESK_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the session token is kept (overrides FEEDESK_SESSION_FILE).
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    Logout,
    Register(RegisterArgs),
    /// Show the signed-in account.
    Whoami,
    #[command(subcommand)]
    Profile(ProfileCommand),
    Dashboard,
    #[command(subcommand)]
    Students(StudentsCommand),
    #[command(subcommand)]
    Payments(PaymentsCommand),
    #[command(subcommand)]
    Fees(FeesCommand),
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: String,
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub phone_number: String,
    #[arg(long, default_value = "")]
    pub address: String,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Update {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct StudentArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long, default_value = "1")]
    pub grade: String,
    #[arg(long, default_value = "CBSE")]
    pub board: String,
    #[arg(long)]
    pub parent_name: String,
    #[arg(long)]
    pub contact: String,
    #[arg(long)]
    pub secondary_contact: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub admission_date: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum StudentsCommand {
    List,
    Search { query: String },
    /// Student record with payment history and balance.
    Show { id: i64 },
    Add(StudentArgs),
    Update {
        id: i64,
        #[command(flatten)]
        student: StudentArgs,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct PaymentArgs {
    #[arg(long)]
    pub student: i64,
    #[arg(long)]
    pub amount: f64,
    #[arg(long, default_value = "Cash")]
    pub mode: PaymentMode,
    #[arg(long, default_value = "Term 1")]
    pub term: PaymentTerm,
    #[arg(long)]
    pub amount_due: Option<f64>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub due_date: Option<String>,
    #[arg(long)]
    pub transaction_id: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PaymentsCommand {
    List,
    Add(PaymentArgs),
    Update {
        id: i64,
        #[command(flatten)]
        payment: PaymentArgs,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// School-wide totals by payment mode.
    Overview,
}

#[derive(Subcommand, Debug)]
pub enum FeesCommand {
    List,
    Add {
        #[arg(long)]
        grade: String,
        #[arg(long)]
        board: String,
        #[arg(long)]
        amount: f64,
    },
    Update {
        id: i64,
        #[arg(long)]
        grade: String,
        #[arg(long)]
        board: String,
        #[arg(long)]
        amount: f64,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    Lookup {
        #[arg(long)]
        grade: String,
        #[arg(long)]
        board: String,
    },
}

impl Command {
    pub fn requires_session(&self) -> bool {
        !matches!(self, Command::Login { .. } | Command::Logout | Command::Register(_))
    }
}
