//! Command execution for the SpEd Connect CLI.
//!
//! `App` owns the configuration, the shared session and the API client. The
//! client is built with a [`SessionReset`] handler wired to a
//! [`TerminalNavigator`], so any 401 during a command signs the user out and
//! tells them how to sign back in.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use spedconnect_core::api::DEFAULT_PER_PAGE;
use spedconnect_core::models::{
    CouponCreate, ProviderDetails, ProviderQuery, RatingInput, ServiceInput, MAX_COUPONS,
};
use spedconnect_core::utils::{format_optional, format_rating, page_count, truncate_string};
use spedconnect_core::{
    ApiClient, ApiError, Config, CredentialStore, History, Navigator, Route, Session, SessionData,
    SessionReset,
};

use crate::cli::{Command, Toggle};

// ============================================================================
// Constants
// ============================================================================

/// Maximum concurrent API requests for provider details.
const MAX_CONCURRENT_REQUESTS: usize = 5;

/// Column width for names in list output.
const NAME_WIDTH: usize = 28;

/// Column width for descriptions in list output.
const DESCRIPTION_WIDTH: usize = 40;

// ============================================================================
// Navigation
// ============================================================================

/// Navigator for a one-shot CLI: tracks the current screen and tells the
/// user when they have been sent back to the login screen.
#[derive(Debug)]
pub struct TerminalNavigator {
    history: History,
}

impl TerminalNavigator {
    pub fn new(start: Route) -> Self {
        Self {
            history: History::new(start),
        }
    }

    /// Move without telling the user, for sign-outs they asked for.
    fn navigate_quietly(&self, route: Route) {
        self.history.replace(route);
    }

    /// Returns true only for the one caller that moved onto the login screen,
    /// however many 401s race to get there.
    fn enter(&self, route: Route) -> bool {
        self.history.replace(route) && route == Route::Login
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        if self.enter(route) {
            eprintln!("Your session has expired. Run `sped-connect login` to sign in again.");
        }
    }

    fn location(&self) -> Route {
        self.history.location()
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    config: Config,
    session: Arc<Session>,
    navigator: Arc<TerminalNavigator>,
    api: ApiClient,
    credentials: CredentialStore,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let base_url = config.base_url()?;

        let session = Arc::new(Session::new(config.cache_dir()?));
        match session.load() {
            Ok(true) => debug!("Loaded saved session"),
            Ok(false) => debug!("No saved session"),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session");
                session.clear()?;
            }
        }

        let start = if session.is_authenticated() {
            Route::Profile
        } else {
            Route::Login
        };
        let navigator = Arc::new(TerminalNavigator::new(start));
        let on_unauthorized = SessionReset::new(session.clone(), navigator.clone());
        let api = ApiClient::new(&base_url, session.clone(), on_unauthorized)?
            .with_scheme(config.auth_scheme);

        Ok(Self {
            config,
            session,
            navigator,
            api,
            credentials: CredentialStore::default(),
        })
    }

    /// Run one command, then persist whatever the session picked up.
    pub async fn run(&mut self, command: Command) -> Result<()> {
        if let Some(route) = command.route() {
            let target = route.guard(self.session.is_authenticated());
            if target != route {
                if route.requires_session() {
                    bail!("You are not signed in. Run `sped-connect login` first.");
                }
                if let Some(profile) = self.session.profile() {
                    println!(
                        "Already signed in as {}; {} is only available signed out. \
                         Run `sped-connect logout` first.",
                        profile.email, route
                    );
                }
                self.navigator.navigate(target);
                return Ok(());
            }
            self.navigator.navigate(route);
        }

        let result = self.execute(command).await;

        if self.session.is_authenticated() {
            self.session.save()?;
        }
        result
    }

    async fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login => self.login_interactive().await,
            Command::Logout => self.logout().await,
            Command::Whoami => self.whoami(),
            Command::ForgotPassword { email } => {
                let payload = self.api.forgot_password(&email).await?;
                println!(
                    "{}",
                    payload.message_or("Check your email for a password reset link.")
                );
                Ok(())
            }
            Command::ResetPassword { token } => self.reset_password(&token).await,
            Command::Profile => self.profile().await,
            Command::Insurance => {
                let payload = self.api.insurance_list().await?;
                for option in payload.result {
                    println!("{}", option.name);
                }
                Ok(())
            }
            Command::Occupations => {
                let payload = self.api.occupation_list().await?;
                for option in payload.result {
                    println!("{}", option.name);
                }
                Ok(())
            }
            Command::Services { page, search } => self.services(page, &search).await,
            Command::ServiceAdd {
                name,
                rate,
                description,
            } => {
                let input = ServiceInput {
                    name,
                    description: description.join(" "),
                    rate,
                };
                let payload = self.api.add_service(&input).await?;
                println!("{}", payload.message_or("Service added."));
                Ok(())
            }
            Command::ServiceUpdate {
                id,
                name,
                rate,
                description,
            } => {
                let input = ServiceInput {
                    name,
                    description: description.join(" "),
                    rate,
                };
                let payload = self.api.update_service(&id, &input).await?;
                println!("{}", payload.message_or("Service updated."));
                Ok(())
            }
            Command::ServiceDelete { id } => {
                let payload = self.api.delete_service(&id).await?;
                println!("{}", payload.message_or("Service deleted."));
                Ok(())
            }
            Command::Directory {
                page,
                search,
                rating,
                insurance,
                token,
            } => {
                let query = ProviderQuery {
                    page,
                    per_page: DEFAULT_PER_PAGE,
                    search,
                    rating,
                    insurance,
                };
                let payload = self.api.providers(&query, token.as_deref()).await?;
                let page = payload.result;
                if page.providers_details.is_empty() {
                    println!("No providers found.");
                    return Ok(());
                }
                for provider in &page.providers_details {
                    println!(
                        "{:<24}  {:<w$}  {:<20}  {}",
                        provider.id,
                        truncate_string(&provider.full_name(), NAME_WIDTH),
                        truncate_string(&provider.occupation, 20),
                        format_rating(provider.average_rate, provider.ratings_count),
                        w = NAME_WIDTH,
                    );
                }
                println!(
                    "\nPage {} of {} ({} providers)",
                    query.page,
                    page_count(page.total_count, query.per_page),
                    page.total_count
                );
                Ok(())
            }
            Command::Provider { ids, token } => self.providers(ids, token).await,
            Command::Rate {
                provider_id,
                rate,
                comment,
                token,
            } => {
                let input = RatingInput {
                    provider_id,
                    rate,
                    description: comment.join(" "),
                };
                let payload = self.api.add_rating(&input, token.as_deref()).await?;
                println!("{}", payload.message_or("Thanks for your rating."));
                Ok(())
            }
            Command::Plans => self.plans().await,
            Command::Checkout { plan_id } => {
                let checkout = self.api.stripe_payment(&plan_id).await?;
                match checkout {
                    Value::String(url) => println!("Complete your payment at: {}", url),
                    other => println!("{}", serde_json::to_string_pretty(&other)?),
                }
                Ok(())
            }
            Command::Coupons { page } => self.coupons(page).await,
            Command::CouponCreate { count } => self.create_coupons(count).await,
            Command::CouponToggle { id, state } => {
                let active = state == Toggle::On;
                let payload = self.api.set_coupon_active(&id, active).await?;
                let fallback = if active {
                    "Coupon activated."
                } else {
                    "Coupon deactivated."
                };
                println!("{}", payload.message_or(fallback));
                Ok(())
            }
        }
    }

    // ===== Account =====

    /// Interactive login
    async fn login_interactive(&mut self) -> Result<()> {
        println!("\n=== SpEd Connect Login ===\n");

        let email = match self.config.last_email.clone() {
            Some(last_email) => {
                let input = Self::prompt(&format!("Email [{}]: ", last_email))?;
                if input.is_empty() {
                    last_email
                } else {
                    input
                }
            }
            None => Self::prompt("Email: ")?,
        };
        if email.is_empty() {
            bail!("Email is required");
        }

        let stored = self.credentials.password(&email).unwrap_or_else(|e| {
            warn!(error = %e, "Could not read stored password");
            None
        });
        let password = match stored {
            Some(stored) => {
                let input = Self::prompt("Use stored password? [Y/n]: ")?;
                if input.to_lowercase() != "n" {
                    stored
                } else {
                    Self::prompt_password()?
                }
            }
            None => Self::prompt_password()?,
        };

        println!("\nAuthenticating...");

        let payload = self.api.login(&email, &password).await?;
        if !self.session.is_authenticated() {
            bail!("Login response did not include a session token");
        }
        self.session.save()?;

        if let Err(e) = self.credentials.store(&email, &password) {
            warn!(error = %e, "Could not store password in keyring");
        }

        self.config.last_email = Some(email);
        self.config.save()?;
        self.navigator.navigate(Route::Profile);

        info!(user = %payload.result.id, "Logged in");
        println!("Welcome, {}!\n", payload.result.full_name());
        Ok(())
    }

    /// Sign out on the server, then locally regardless of the outcome.
    async fn logout(&mut self) -> Result<()> {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Server logout failed");
        }
        self.session.clear()?;
        if let Some(ref email) = self.config.last_email {
            if let Err(e) = self.credentials.forget(email) {
                warn!(error = %e, "Could not remove stored password");
            }
        }
        self.navigator.navigate_quietly(Route::Login);
        println!("Signed out.");
        Ok(())
    }

    fn whoami(&self) -> Result<()> {
        let data = self.session.data().context("Not signed in")?;
        println!("{}", Self::account_summary(&data));
        Ok(())
    }

    fn account_summary(data: &SessionData) -> String {
        let plan = match data.active_plan.as_ref() {
            Some(plan) => format!("{} ({})", plan.name, plan.price),
            None => "-".to_string(),
        };
        format!(
            "{} <{}>\nRole:     {}\nPlan:     {}\nSigned in {} minutes ago",
            data.profile.full_name(),
            data.profile.email,
            format_optional(Some(data.profile.role.as_str()), "-"),
            plan,
            data.age_minutes()
        )
    }

    async fn reset_password(&self, token: &str) -> Result<()> {
        let password = rpassword::prompt_password("New password: ")?;
        let confirm = rpassword::prompt_password("Confirm password: ")?;
        if password != confirm {
            bail!("Passwords do not match");
        }
        let payload = self.api.reset_password(token, &password).await?;
        println!("{}", payload.message_or("Password updated. You can now log in."));
        Ok(())
    }

    async fn profile(&self) -> Result<()> {
        let payload = self.api.profile().await?;
        let profile = payload.result;

        println!("{}", profile.full_name());
        println!("Email:      {}", profile.email);
        println!("Phone:      {}", format_optional(Some(profile.phone_number.as_str()), "-"));
        println!("Occupation: {}", format_optional(Some(profile.occupation.as_str()), "-"));
        println!("Address:    {}", format_optional(Some(profile.address.as_str()), "-"));
        println!(
            "Location:   {}, {} {}",
            profile.city.label, profile.state.label, profile.zip_code
        );
        if !profile.insurance_plans.is_empty() {
            println!("Insurance:  {}", profile.insurance_plans.join(", "));
        }
        println!("Bio:        {}", format_optional(profile.bio.as_deref(), "-"));

        self.session.set_profile(profile);
        Ok(())
    }

    // ===== Services =====

    async fn services(&self, page: u32, search: &str) -> Result<()> {
        let payload = self.api.own_services(page, DEFAULT_PER_PAGE, search).await?;
        let services = payload.result;
        if services.services.is_empty() {
            println!("No services found.");
            return Ok(());
        }
        for service in &services.services {
            println!(
                "{:<24}  {:<w$}  {:>8}  {}",
                service.id,
                truncate_string(&service.name, NAME_WIDTH),
                service.rate_display(),
                truncate_string(&service.description, DESCRIPTION_WIDTH),
                w = NAME_WIDTH,
            );
        }
        println!(
            "\nPage {} of {} ({} services)",
            page,
            page_count(services.total_count, DEFAULT_PER_PAGE),
            services.total_count
        );
        Ok(())
    }

    // ===== Directory =====

    /// Fetch several providers with limited concurrency, printing each in
    /// the order requested.
    async fn providers(&self, ids: Vec<String>, token: Option<String>) -> Result<()> {
        debug!(
            count = ids.len(),
            "Fetching providers with max {} concurrent requests", MAX_CONCURRENT_REQUESTS
        );

        let mut results: Vec<(usize, String, Result<ProviderDetails, ApiError>)> =
            stream::iter(ids.into_iter().enumerate())
                .map(|(index, id)| {
                    let api = self.api.clone();
                    let token = token.clone();
                    async move {
                        let result = api
                            .provider(&id, token.as_deref())
                            .await
                            .map(|payload| payload.result);
                        (index, id, result)
                    }
                })
                .buffer_unordered(MAX_CONCURRENT_REQUESTS)
                .collect()
                .await;
        results.sort_by_key(|(index, _, _)| *index);

        let mut failures = 0;
        for (_, id, result) in results {
            match result {
                Ok(provider) => Self::print_provider(&provider),
                Err(e) => {
                    failures += 1;
                    eprintln!("{}: {}", id, e.server_message().unwrap_or_else(|| e.to_string()));
                }
            }
        }
        if failures > 0 {
            bail!("{} provider lookup(s) failed", failures);
        }
        Ok(())
    }

    fn print_provider(provider: &ProviderDetails) {
        println!("\n{} ({})", provider.full_name(), provider.occupation);
        println!(
            "Rating:   {}",
            format_rating(provider.average_rate, provider.ratings_count)
        );
        println!("Email:    {}", provider.email);
        println!("Phone:    {}", format_optional(Some(provider.phone_number.as_str()), "-"));
        println!("Address:  {}", format_optional(Some(provider.full_address.as_str()), "-"));
        if !provider.insurance_plans.is_empty() {
            println!("Accepts:  {}", provider.insurance_plans.join(", "));
        }
        if let Some(ref bio) = provider.bio {
            println!("About:    {}", bio);
        }
        for service in &provider.services {
            println!(
                "  - {} ({}): {}",
                service.name,
                service.rate_display(),
                truncate_string(&service.description, DESCRIPTION_WIDTH)
            );
        }
    }

    // ===== Plans and coupons =====

    async fn plans(&self) -> Result<()> {
        let payload = self.api.subscription_plans().await?;
        let overview = payload.result;
        for plan in &overview.plans {
            let marker = if plan.is_active_plan { "*" } else { " " };
            println!(
                "{} {:<24}  {:<w$}  {:>8}  {}",
                marker,
                plan.id,
                plan.name,
                plan.price,
                plan.kind,
                w = NAME_WIDTH,
            );
        }
        if let Some(ref expiration) = overview.active_plan_expiration {
            println!("\nActive plan expires {}", expiration);
        }
        Ok(())
    }

    async fn coupons(&self, page: u32) -> Result<()> {
        let payload = self.api.coupons(page, DEFAULT_PER_PAGE).await?;
        let coupons = payload.result;
        if coupons.coupons.is_empty() {
            println!("No coupon codes yet.");
            return Ok(());
        }
        for coupon in &coupons.coupons {
            let state = match (coupon.is_used, coupon.is_active) {
                (true, _) => "used",
                (false, true) => "active",
                (false, false) => "inactive",
            };
            println!("{:<24}  {:<16}  {}", coupon.id, coupon.code, state);
        }
        println!(
            "\nPage {} of {} ({} of {} coupon codes used)",
            page,
            page_count(coupons.total_count, DEFAULT_PER_PAGE),
            coupons.total_count,
            MAX_COUPONS
        );
        if let Some(ref expiration) = coupons.coupon_expiration {
            println!("Codes expire {}", expiration);
        }
        Ok(())
    }

    async fn create_coupons(&self, count: u64) -> Result<()> {
        let plan = match self.session.active_plan() {
            Some(plan) => plan,
            None => {
                // The active plan is only known after the plans have been fetched.
                self.api.subscription_plans().await?;
                self.session
                    .active_plan()
                    .context("You need an active plan to create coupon codes")?
            }
        };

        let existing = self.api.coupons(1, DEFAULT_PER_PAGE).await?.into_result();
        let remaining = existing.remaining_slots();
        if count > remaining {
            bail!(
                "You can create at most {} more coupon code(s) on this plan",
                remaining
            );
        }

        let request = CouponCreate {
            count,
            plan_id: plan.id,
        };
        let payload = self.api.create_coupons(&request).await?;
        println!("{}", payload.message_or("Coupon codes created."));
        Ok(())
    }

    // ===== Prompts =====

    fn prompt(label: &str) -> Result<String> {
        print!("{}", label);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }

    fn prompt_password() -> Result<String> {
        let password = rpassword::prompt_password("Password: ")?;
        Ok(password)
    }
}
