//! wasmtx CLI Application
//!
//! Builds, signs and queues transactions for the wasm contract module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use wasm_tx::cli::{self, AppState, ExecuteFlags, InstantiateFlags, StoreCodeFlags, TxFlags};

#[derive(Parser)]
#[command(name = "wasmtx")]
#[command(version)]
#[command(about = "Wasm contract transaction builder", long_about = None)]
struct Cli {
    /// Directory holding config, keys and the outbox
    #[arg(long, global = true, default_value = ".wasmtx")]
    home: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Key management
    Keys {
        #[command(subcommand)]
        action: KeysCommands,
    },

    /// Client configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Transaction subcommands
    Tx {
        #[command(subcommand)]
        module: TxCommands,
    },
}

#[derive(Subcommand)]
enum KeysCommands {
    /// Generate a new key
    Add { name: String },

    /// Import a hex encoded secp256k1 private key
    Import { name: String, private_key_hex: String },

    /// List all keys
    List,

    /// Show a key's address and public key
    Show { name: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the configuration
    Show,

    /// Write the configuration file
    Init {
        #[arg(long)]
        chain_id: Option<String>,

        /// Bech32 prefix of account addresses
        #[arg(long)]
        prefix: Option<String>,
    },
}

#[derive(Subcommand)]
enum TxCommands {
    /// Wasm transaction subcommands
    Wasm {
        #[command(subcommand)]
        action: WasmCommands,
    },
}

#[derive(Subcommand)]
enum WasmCommands {
    /// Upload a wasm binary
    Store {
        /// Wasm binary or gzip of one
        wasm_file: PathBuf,

        /// A valid URI reference to the contract's source code
        #[arg(long, default_value = "")]
        source: String,

        /// A valid docker tag for the build system
        #[arg(long, default_value = "")]
        builder: String,

        /// Everybody can instantiate a contract from the code
        #[arg(long)]
        instantiate_everybody: bool,

        /// Only this address can instantiate a contract from the code
        #[arg(long)]
        instantiate_only_address: Option<String>,

        #[command(flatten)]
        tx: TxArgs,
    },

    /// Instantiate a wasm contract
    Instantiate {
        code_id: String,

        /// Init message as JSON
        json_encoded_init_args: String,

        /// A human-readable name for this contract
        #[arg(long, default_value = "")]
        label: String,

        /// Coins to send to the contract during instantiation
        #[arg(long, default_value = "")]
        amount: String,

        /// Address of an admin
        #[arg(long)]
        admin: Option<String>,

        #[command(flatten)]
        tx: TxArgs,
    },

    /// Execute a command on a wasm contract
    Execute {
        contract_addr_bech32: String,

        /// Call message as JSON
        json_encoded_send_args: String,

        /// Coins to send to the contract along with the command
        #[arg(long, default_value = "")]
        amount: String,

        #[command(flatten)]
        tx: TxArgs,
    },

    /// Migrate a wasm contract to a new code version
    Migrate {
        contract_addr_bech32: String,
        new_code_id: String,

        /// Migrate message as JSON
        json_encoded_migration_args: String,

        #[command(flatten)]
        tx: TxArgs,
    },

    /// Set new admin for a contract
    #[command(name = "set-contract-admin", alias = "update-admin")]
    UpdateAdmin {
        contract_addr_bech32: String,
        new_admin_addr_bech32: String,

        #[command(flatten)]
        tx: TxArgs,
    },

    /// Clears admin for a contract to prevent further migrations
    #[command(name = "clear-contract-admin", alias = "clear-admin")]
    ClearAdmin {
        contract_addr_bech32: String,

        #[command(flatten)]
        tx: TxArgs,
    },
}

/// Flags shared by every transaction command
#[derive(Args)]
struct TxArgs {
    /// Key name or address of the sender
    #[arg(long)]
    from: String,

    #[arg(long)]
    chain_id: Option<String>,

    #[arg(long, default_value = "0")]
    account_number: u64,

    #[arg(long, default_value = "0")]
    sequence: u64,

    /// Gas limit
    #[arg(long)]
    gas: Option<u64>,

    /// Fee coins, e.g. 5000afet
    #[arg(long)]
    fees: Option<String>,

    #[arg(long, default_value = "")]
    memo: String,

    /// Print the unsigned transaction instead of signing it
    #[arg(long)]
    generate_only: bool,
}

impl From<TxArgs> for TxFlags {
    fn from(args: TxArgs) -> Self {
        TxFlags {
            from: args.from,
            chain_id: args.chain_id,
            account_number: args.account_number,
            sequence: args.sequence,
            gas: args.gas,
            fees: args.fees,
            memo: args.memo,
            generate_only: args.generate_only,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger
    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Config init works before the home directory exists
    if let Commands::Config {
        action: ConfigCommands::Init { chain_id, prefix },
    } = &cli.command
    {
        return cli::cmd_config_init(&cli.home, chain_id.as_deref(), prefix.as_deref())
            .map_err(Into::into);
    }

    let state = AppState::new(cli.home.clone())?;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigCommands::Show => cli::cmd_config_show(&state)?,
            ConfigCommands::Init { .. } => unreachable!(),
        },

        Commands::Keys { action } => match action {
            KeysCommands::Add { name } => cli::cmd_keys_add(&state, &name)?,
            KeysCommands::Import {
                name,
                private_key_hex,
            } => cli::cmd_keys_import(&state, &name, &private_key_hex)?,
            KeysCommands::List => cli::cmd_keys_list(&state)?,
            KeysCommands::Show { name } => cli::cmd_keys_show(&state, &name)?,
        },

        Commands::Tx {
            module: TxCommands::Wasm { action },
        } => run_wasm_command(&state, action)?,
    }

    Ok(())
}

fn run_wasm_command(state: &AppState, action: WasmCommands) -> cli::CliResult<()> {
    match action {
        WasmCommands::Store {
            wasm_file,
            source,
            builder,
            instantiate_everybody,
            instantiate_only_address,
            tx,
        } => {
            let flags = StoreCodeFlags {
                source,
                builder,
                instantiate_everybody,
                instantiate_only_address,
            };
            cli::cmd_tx_store(state, &wasm_file, &flags, &tx.into())
        }

        WasmCommands::Instantiate {
            code_id,
            json_encoded_init_args,
            label,
            amount,
            admin,
            tx,
        } => {
            let flags = InstantiateFlags {
                label,
                amount,
                admin,
            };
            cli::cmd_tx_instantiate(state, &code_id, &json_encoded_init_args, &flags, &tx.into())
        }

        WasmCommands::Execute {
            contract_addr_bech32,
            json_encoded_send_args,
            amount,
            tx,
        } => cli::cmd_tx_execute(
            state,
            &contract_addr_bech32,
            &json_encoded_send_args,
            &ExecuteFlags { amount },
            &tx.into(),
        ),

        WasmCommands::Migrate {
            contract_addr_bech32,
            new_code_id,
            json_encoded_migration_args,
            tx,
        } => cli::cmd_tx_migrate(
            state,
            &contract_addr_bech32,
            &new_code_id,
            &json_encoded_migration_args,
            &tx.into(),
        ),

        WasmCommands::UpdateAdmin {
            contract_addr_bech32,
            new_admin_addr_bech32,
            tx,
        } => cli::cmd_tx_update_admin(
            state,
            &contract_addr_bech32,
            &new_admin_addr_bech32,
            &tx.into(),
        ),

        WasmCommands::ClearAdmin {
            contract_addr_bech32,
            tx,
        } => cli::cmd_tx_clear_admin(state, &contract_addr_bech32, &tx.into()),
    }
}
