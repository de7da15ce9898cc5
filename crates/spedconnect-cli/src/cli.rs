//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use spedconnect_core::models::RatingRange;
use spedconnect_core::Route;

#[derive(Parser, Debug)]
#[command(name = "sped-connect")]
#[command(version)]
#[command(about = "Manage your SpEd Connect listing, services, plans and coupon codes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Sign in (prompts for email and password)
    Login,
    /// Sign out and forget the stored password
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Email a password reset link
    ForgotPassword { email: String },
    /// Choose a new password with the token from the reset email
    ResetPassword {
        #[arg(value_name = "RESET_TOKEN")]
        token: String,
    },
    /// Show your profile
    Profile,
    /// List insurance plans
    Insurance,
    /// List occupations
    Occupations,

    /// List your services
    Services {
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        #[arg(default_value = "")]
        search: String,
    },
    /// Add a service
    ServiceAdd {
        name: String,
        rate: String,
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
    /// Update one of your services
    ServiceUpdate {
        id: String,
        name: String,
        rate: String,
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
    /// Delete one of your services
    ServiceDelete { id: String },

    /// Browse the provider directory
    Directory {
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        #[arg(default_value = "")]
        search: String,
        /// Rating bucket: all, 0, 1-2, 2-3, 3-4 or 4-5
        #[arg(long, default_value = "all", value_parser = parse_rating)]
        rating: RatingRange,
        /// Only providers accepting this insurance
        #[arg(long, default_value = "")]
        insurance: String,
        /// Token from the directory link
        #[arg(long)]
        token: Option<String>,
    },
    /// Show provider details
    Provider {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Token from the directory link
        #[arg(long)]
        token: Option<String>,
    },
    /// Rate a provider from 1 to 5
    Rate {
        provider_id: String,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rate: u8,
        comment: Vec<String>,
        /// Token from the directory link
        #[arg(long)]
        token: Option<String>,
    },

    /// List subscription plans
    Plans,
    /// Start a Stripe checkout for a plan
    Checkout { plan_id: String },
    /// List coupon codes
    Coupons {
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Create coupon codes for your active plan
    CouponCreate {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        count: u64,
    },
    /// Activate or deactivate a coupon code
    CouponToggle { id: String, state: Toggle },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

fn parse_rating(s: &str) -> Result<RatingRange, String> {
    RatingRange::parse(s).ok_or_else(|| format!("unknown rating range '{}'", s))
}

impl Command {
    /// The screen this command belongs to, checked against the route guard.
    /// Pick lists are public and belong to no screen.
    pub fn route(&self) -> Option<Route> {
        let route = match self {
            Command::Login | Command::ForgotPassword { .. } => Route::Login,
            Command::ResetPassword { .. } => Route::ResetPassword,
            Command::Logout | Command::Whoami | Command::Profile => Route::Profile,
            Command::Insurance | Command::Occupations => return None,
            Command::Services { .. }
            | Command::ServiceAdd { .. }
            | Command::ServiceUpdate { .. }
            | Command::ServiceDelete { .. } => Route::Service,
            Command::Directory { .. } => Route::Directory,
            Command::Provider { .. } | Command::Rate { .. } => Route::DirectoryDetails,
            Command::Plans | Command::Checkout { .. } => Route::Subscription,
            Command::Coupons { .. } | Command::CouponCreate { .. } | Command::CouponToggle { .. } => {
                Route::CouponCode
            }
        };
        Some(route)
    }
}
