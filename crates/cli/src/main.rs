//! Handoff shell binary.
//!
//! Runs a script of user actions against a simulated wallet, handing each one
//! off through the single-flight bridge and printing the shell state the UI
//! would render.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use handoff_coordinator::{CoordinatorConfig, RequestCoordinator, UiState, UserAction, WalletSession};
use handoff_host_sim::{SimulatedHost, WalletProfile};
use tracing::info;

/// Shell command line arguments.
#[derive(Parser, Debug)]
#[command(name = "handoff")]
#[command(about = "Drive a simulated wallet through single-flight hand-offs")]
struct Args {
	/// Coordinator configuration file (TOML)
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Simulated time the wallet holds foreground control
	#[arg(long, value_name = "MS", default_value_t = 250)]
	latency_ms: u64,

	/// Simulate a device with no wallet installed
	#[arg(long)]
	no_wallet: bool,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,

	/// Actions to run in order, e.g. `authorize sign-txn:3 txn-version:v0 deauthorize`
	#[arg(value_name = "ACTION", default_values_t = default_script())]
	actions: Vec<UserAction>,
}

fn default_script() -> Vec<UserAction> {
	vec![
		UserAction::Authorize,
		UserAction::SignTransactions(1),
		UserAction::SignMessages(3),
		UserAction::Deauthorize,
	]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config_path = args.config.clone().or_else(|| dirs::config_dir().map(|dir| dir.join("handoff").join("config.toml")));
	let config = match &config_path {
		Some(path) => CoordinatorConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
		None => CoordinatorConfig::default(),
	};
	info!(config = ?config_path, ?config, "Starting handoff shell");

	let (host, session) = if args.no_wallet {
		handoff_host_sim::uninstalled()
	} else {
		handoff_host_sim::installed(WalletProfile::default(), Duration::from_millis(args.latency_ms))
	};
	let shell = RequestCoordinator::new(host, session, config);
	shell.check_wallet_endpoint_available();
	show_messages(&shell);

	let mut failures = 0usize;
	for action in &args.actions {
		info!(?action, "running action");
		if shell.perform(*action).await.is_err() {
			failures += 1;
		}
		show_messages(&shell);
	}

	print_state(&shell.snapshot());
	if failures > 0 {
		anyhow::bail!("{failures} of {} actions failed", args.actions.len());
	}
	Ok(())
}

/// Prints and dismisses queued messages, as a snackbar would.
fn show_messages<S: WalletSession>(shell: &RequestCoordinator<SimulatedHost, S>) {
	while let Some(message) = shell.snapshot().current_message().map(str::to_owned) {
		println!("> {message}");
		shell.message_shown();
	}
}

fn print_state(state: &UiState) {
	println!("authorized:       {}", state.has_auth_token);
	println!("account:          {}", state.account_label.as_deref().unwrap_or("<no account>"));
	println!("wallet uri base:  {}", state.wallet_uri_base.as_deref().unwrap_or("<default>"));
	println!("txn version:      {}", state.txn_version);
	println!("wallet available: {}", state.wallet_endpoint_available);
}
