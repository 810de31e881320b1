use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use tracing::{debug, info};

use crate::auth::{Credentials, ProfileUpdate, Registration};
use crate::cli::{
    Cli, Command, FeesCommand, PaymentArgs, PaymentsCommand, ProfileCommand, StudentArgs,
    StudentsCommand,
};
use crate::config::AppConfig;
use crate::de::parse_date;
use crate::fees::FeeStructureForm;
use crate::format::{format_currency, format_optional_date};
use crate::page::PageState;
use crate::payments::{Payment, PaymentForm};
use crate::routes::Route;
use crate::state::AppState;
use crate::students::{Student, StudentForm};

pub fn init_tracing() {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "feedesk=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // logs go to stderr so command output stays clean
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .init();
    }
}

pub fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(path) = &cli.session_file {
        config.session_file = path.clone();
    }
    Ok(config)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    debug!(api = %config.api.base_url, session = %config.session_file.display(), "configuration loaded");
    let state = AppState::init(config)
        .await
        .context("failed to initialise session")?;

    let guarded = cli.command.requires_session();
    if guarded {
        let landed = state.visit(command_route(&cli.command)).await;
        if landed == Route::Login {
            bail!("not signed in; redirected to {landed}. Run `feedesk login` first");
        }
    }

    let result = match cli.command {
        Command::Login { email, password } => login(&state, email, password).await,
        Command::Logout => {
            state.auth.logout().await;
            println!("Signed out.");
            Ok(())
        }
        Command::Register(args) => register(&state, args.into()).await,
        Command::Whoami => whoami(&state).await,
        Command::Profile(ProfileCommand::Update {
            email,
            username,
            first_name,
            last_name,
            phone_number,
            address,
        }) => {
            let update = ProfileUpdate {
                email,
                username,
                first_name,
                last_name,
                phone_number,
                address,
            };
            let outcome = state.auth.update_profile(&update).await;
            if !outcome.success {
                bail!(outcome.error.unwrap_or_default());
            }
            println!("Profile updated.");
            Ok(())
        }
        Command::Dashboard => dashboard(&state).await,
        Command::Students(cmd) => students(&state, cmd).await,
        Command::Payments(cmd) => payments(&state, cmd).await,
        Command::Fees(cmd) => fees(&state, cmd).await,
    };

    // a 401 anywhere above has already cleared the session
    if guarded && state.navigator.current() == Route::Login {
        bail!("session expired; redirected to {}", Route::Login);
    }
    result
}

fn command_route(command: &Command) -> Route {
    match command {
        Command::Students(_) => Route::Students,
        Command::Payments(_) | Command::Fees(_) => Route::Payments,
        _ => Route::Dashboard,
    }
}

/// Turns a page's final state into the command's exit status.
fn finish(state: &PageState) -> anyhow::Result<()> {
    if let PageState::Error(message) = state {
        bail!("{message}");
    }
    Ok(())
}

fn ask_yes_no(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn read_password() -> anyhow::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn optional_date(raw: Option<&str>) -> anyhow::Result<Option<time::Date>> {
    raw.map(|s| parse_date(s).with_context(|| format!("invalid date {s:?}, expected YYYY-MM-DD")))
        .transpose()
}

async fn login(state: &AppState, email: String, password: Option<String>) -> anyhow::Result<()> {
    let mut page = state.login_page();
    if page.mount().await == Route::Dashboard {
        println!("Already signed in.");
        return Ok(());
    }
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    page.form = Credentials { email, password };
    if page.submit().await {
        let name = state
            .auth
            .current_user()
            .await
            .map(|u| u.display_name())
            .unwrap_or_else(|| "User".to_string());
        info!("signed in");
        println!("Welcome, {name}.");
    }
    finish(&page.state)
}

async fn register(state: &AppState, registration: Registration) -> anyhow::Result<()> {
    let mut page = state.register_page();
    page.form = registration;
    if page.submit().await {
        println!(
            "{}",
            page.success_message
                .as_deref()
                .unwrap_or("Registration successful.")
        );
    }
    finish(&page.state)
}

impl From<crate::cli::RegisterArgs> for Registration {
    fn from(args: crate::cli::RegisterArgs) -> Self {
        Registration {
            email: args.email,
            username: args.username,
            password: args.password,
            confirm_password: args.confirm_password,
            first_name: args.first_name,
            last_name: args.last_name,
            phone_number: args.phone_number,
            address: args.address,
        }
    }
}

async fn whoami(state: &AppState) -> anyhow::Result<()> {
    let user = match state.auth.refresh_profile().await {
        Ok(user) => user,
        Err(e) => {
            debug!(error = %e, "profile refresh failed; using stored copy");
            match state.auth.current_user().await {
                Some(user) => user,
                None => bail!("no profile available"),
            }
        }
    };
    println!("{} <{}>", user.display_name(), user.email);
    if let Some(username) = &user.username {
        println!("username: {username}");
    }
    if let Some(kind) = &user.user_type {
        println!("role:     {kind}");
    }
    Ok(())
}

async fn dashboard(state: &AppState) -> anyhow::Result<()> {
    let mut page = state.dashboard();
    page.mount().await;
    finish(&page.state)?;
    let stats = &page.stats;
    println!("Students:  {}", stats.total_students);
    println!("Payments:  {}", stats.total_payments);
    println!("Revenue:   {}", format_currency(stats.total_revenue));
    println!(
        "Avg. revenue per student: {}",
        format_currency(stats.average_revenue_per_student)
    );
    if !stats.recent_payments.is_empty() {
        println!("\nRecent payments");
        for p in &stats.recent_payments {
            print_payment(p, p.student_name.as_deref().unwrap_or("Unknown Student"));
        }
    }
    Ok(())
}

fn print_student(s: &Student) {
    println!(
        "{:>5}  {:<24} grade {:<3} {:<5} paid {:>14}  due {:>14}",
        s.id,
        s.name(),
        s.grade,
        s.board,
        format_currency(s.total_paid),
        format_currency(s.balance())
    );
}

fn print_payment(p: &Payment, student: &str) {
    println!(
        "{:>5}  {:<24} {:<7} {:<7} {:>14}  {:<8} {}",
        p.id,
        student,
        p.payment_term,
        p.payment_mode,
        format_currency(p.amount_paid),
        p.status_label(),
        format_optional_date(p.transaction_date)
    );
}

impl StudentArgs {
    fn into_form(self) -> anyhow::Result<StudentForm> {
        Ok(StudentForm {
            admission_date: optional_date(self.admission_date.as_deref())?,
            first_name: self.first_name,
            last_name: self.last_name,
            grade: self.grade,
            board: self.board,
            parent_name: self.parent_name,
            parent_contact_primary: self.contact,
            parent_contact_secondary: self.secondary_contact,
        })
    }
}

impl PaymentArgs {
    fn into_form(self) -> anyhow::Result<PaymentForm> {
        Ok(PaymentForm {
            due_date: optional_date(self.due_date.as_deref())?,
            student: self.student,
            payment_mode: self.mode,
            payment_term: self.term,
            amount_paid: self.amount,
            amount_due: self.amount_due,
            transaction_id: self.transaction_id,
            notes: self.notes,
        })
    }
}

async fn students(state: &AppState, cmd: StudentsCommand) -> anyhow::Result<()> {
    match cmd {
        StudentsCommand::List => {
            let mut page = state.students();
            page.mount().await;
            finish(&page.state)?;
            page.visible().iter().for_each(print_student);
            Ok(())
        }
        StudentsCommand::Search { query } => {
            let mut page = state.students();
            page.mount().await;
            finish(&page.state)?;
            page.search(&query).await;
            finish(&page.state)?;
            if page.visible().is_empty() {
                println!("No students match {query:?}.");
            }
            page.visible().iter().for_each(print_student);
            Ok(())
        }
        StudentsCommand::Show { id } => {
            let mut profile = state.student_profile();
            profile.load(id).await;
            finish(&profile.state)?;
            if let Some(student) = &profile.student {
                print_student(student);
                println!(
                    "parent {} ({}), admitted {}",
                    student.parent_name,
                    student.parent_contact_primary,
                    format_optional_date(student.admission_date)
                );
            }
            if let Some(summary) = &profile.summary {
                println!(
                    "fee {}  paid {}  balance {}",
                    format_currency(summary.total_fee),
                    format_currency(summary.total_paid),
                    format_currency(summary.balance)
                );
            }
            let name = profile.student.as_ref().map(Student::name).unwrap_or_default();
            for p in &profile.payments {
                print_payment(p, &name);
            }
            Ok(())
        }
        StudentsCommand::Add(args) => {
            let mut page = state.students();
            if let Some(created) = page.create(&args.into_form()?).await {
                println!("Student added.");
                print_student(&created);
            }
            finish(&page.state)
        }
        StudentsCommand::Update { id, student } => {
            let mut page = state.students();
            if let Some(updated) = page.update(id, &student.into_form()?).await {
                print_student(&updated);
            }
            finish(&page.state)
        }
        StudentsCommand::Delete { id, yes } => {
            let mut page = state.students();
            let confirm = move |prompt: &str| yes || ask_yes_no(prompt);
            if page.delete(id, &confirm).await {
                println!("Student {id} deleted.");
            }
            finish(&page.state)
        }
    }
}

async fn payments(state: &AppState, cmd: PaymentsCommand) -> anyhow::Result<()> {
    match cmd {
        PaymentsCommand::List => {
            let mut page = state.payments();
            page.mount().await;
            finish(&page.state)?;
            for p in &page.payments {
                let name = p
                    .student_name
                    .clone()
                    .unwrap_or_else(|| page.student_name(p.student));
                print_payment(p, &name);
            }
            Ok(())
        }
        PaymentsCommand::Add(args) => {
            let mut page = state.payments();
            let form = args.into_form()?;
            if page.create(&form).await.is_some() {
                if let Some(message) = &page.success_message {
                    println!("{message}");
                }
            }
            finish(&page.state)
        }
        PaymentsCommand::Update { id, payment } => {
            let mut page = state.payments();
            if let Some(updated) = page.update(id, &payment.into_form()?).await {
                let name = updated.student_name.clone().unwrap_or_default();
                print_payment(&updated, &name);
            }
            finish(&page.state)
        }
        PaymentsCommand::Delete { id, yes } => {
            let mut page = state.payments();
            let confirm = move |prompt: &str| yes || ask_yes_no(prompt);
            if page.delete(id, &confirm).await {
                println!("Payment {id} deleted.");
            }
            finish(&page.state)
        }
        PaymentsCommand::Overview => {
            let mut page = state.payments();
            page.load_overview().await;
            finish(&page.state)?;
            if let Some(overview) = &page.overview {
                println!("Payments: {}", overview.total_payments);
                println!("Total:    {}", format_currency(overview.total_amount));
                for (mode, amount) in &overview.payments_by_mode {
                    println!("  {mode:<8} {}", format_currency(*amount));
                }
            }
            Ok(())
        }
    }
}

async fn fees(state: &AppState, cmd: FeesCommand) -> anyhow::Result<()> {
    let mut page = state.fees();
    match cmd {
        FeesCommand::List => {
            page.mount().await;
            finish(&page.state)?;
            for f in &page.structures {
                println!(
                    "{:>5}  grade {:<3} {:<5} annual {:>14}  term {:>14}",
                    f.id,
                    f.grade,
                    f.board,
                    format_currency(f.fee_amount),
                    format_currency(f.term_fee())
                );
            }
            Ok(())
        }
        FeesCommand::Add { grade, board, amount } => {
            let form = FeeStructureForm {
                grade,
                board,
                fee_amount: amount,
            };
            if let Some(created) = page.create(&form).await {
                println!("Fee structure {} added.", created.id);
            }
            finish(&page.state)
        }
        FeesCommand::Update {
            id,
            grade,
            board,
            amount,
        } => {
            let form = FeeStructureForm {
                grade,
                board,
                fee_amount: amount,
            };
            if page.update(id, &form).await.is_some() {
                println!("Fee structure {id} updated.");
            }
            finish(&page.state)
        }
        FeesCommand::Delete { id, yes } => {
            let confirm = move |prompt: &str| yes || ask_yes_no(prompt);
            if page.delete(id, &confirm).await {
                println!("Fee structure {id} deleted.");
            }
            finish(&page.state)
        }
        FeesCommand::Lookup { grade, board } => {
            let found = page.lookup(&grade, &board).await;
            finish(&page.state)?;
            match found {
                Some(f) => println!(
                    "grade {} {}: annual {}, per term {}",
                    f.grade,
                    f.board,
                    format_currency(f.fee_amount),
                    format_currency(f.term_fee())
                ),
                None => println!("No fee structure for grade {grade} {board}."),
            }
            Ok(())
        }
    }
}
