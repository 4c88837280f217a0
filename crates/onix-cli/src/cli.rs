//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use onix_client::AuthMode;

#[derive(Parser, Debug)]
#[command(name = "ox")]
#[command(version, about = "Onix CMDB inventory and configuration tool", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "OX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// WAPI connection settings; each one overrides the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Network address of the Onix WAPI
    #[arg(long, global = true, env = "OX_HOST")]
    pub uri: Option<String>,

    /// WAPI user
    #[arg(long, global = true, env = "OX_USERNAME")]
    pub username: Option<String>,

    /// WAPI password
    #[arg(long, global = true, env = "OX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Verify the WAPI TLS certificate
    #[arg(long, global = true, env = "OX_VERIFY_SSL")]
    pub verify_ssl: Option<bool>,

    /// Authentication mode: none, basic or oidc
    #[arg(long, global = true, env = "OX_AUTH_MODE")]
    pub auth_mode: Option<AuthMode>,

    /// OAuth 2.0 token endpoint
    #[arg(long, global = true, env = "OX_TOKEN_URI")]
    pub token_uri: Option<String>,

    /// OAuth 2.0 client id
    #[arg(long, global = true, env = "OX_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth 2.0 client secret
    #[arg(long, global = true, env = "OX_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Pre-issued Authorization header value, as printed by `ox setup`
    #[arg(long, global = true, env = "OX_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "OX_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the inventory using the Ansible dynamic inventory protocol
    Inventory(InventoryArgs),
    /// Issue an access token and print it as facts
    Setup,
    /// Create, update or delete a configuration item
    Item(ItemArgs),
    /// Create, update or delete an item type
    #[command(name = "item-type")]
    ItemType(NamedArgs),
    /// Create, update or delete a link between two items
    Link(LinkArgs),
    /// Create, update or delete a link type
    #[command(name = "link-type")]
    LinkType(NamedArgs),
    /// Create, update or delete a link rule
    #[command(name = "link-rule")]
    LinkRule(LinkRuleArgs),
    /// Create, update or delete a model
    Model(NamedArgs),
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("mode").required(true).args(["list", "host"])))]
pub struct InventoryArgs {
    /// Print the whole inventory
    #[arg(long)]
    pub list: bool,

    /// Print the variables of a single host
    #[arg(long, value_name = "NAME")]
    pub host: Option<String>,

    /// Natural key of the inventory
    #[arg(long, env = "OX_INVENTORY_KEY")]
    pub inventory_key: Option<String>,

    /// Tag of the inventory snapshot
    #[arg(long, env = "OX_INVENTORY_TAG")]
    pub inventory_tag: Option<String>,
}

/// Desired state of a resource
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Present,
    Absent,
}

#[derive(Args, Debug)]
pub struct ItemArgs {
    /// Natural key of the item
    #[arg(long)]
    pub key: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Item type key
    #[arg(long = "type")]
    pub item_type: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub status: i64,
    /// Metadata as a JSON object
    #[arg(long, default_value = "{}")]
    pub meta: String,
    /// Tags (comma separated or repeated)
    #[arg(long, value_delimiter = ',')]
    pub tag: Vec<String>,
    /// Attributes as a JSON object
    #[arg(long, default_value = "{}")]
    pub attribute: String,
    #[arg(long, value_enum, default_value_t)]
    pub state: State,
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Natural key of the link
    #[arg(long)]
    pub key: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Link type key
    #[arg(long = "type")]
    pub link_type: String,
    #[arg(long)]
    pub start_item_key: Option<String>,
    #[arg(long)]
    pub end_item_key: Option<String>,
    /// Metadata as a JSON object
    #[arg(long, default_value = "{}")]
    pub meta: String,
    /// Tags (comma separated or repeated)
    #[arg(long, value_delimiter = ',')]
    pub tag: Vec<String>,
    /// Attributes as a JSON object
    #[arg(long, default_value = "{}")]
    pub attribute: String,
    #[arg(long, value_enum, default_value_t)]
    pub state: State,
}

#[derive(Args, Debug)]
pub struct LinkRuleArgs {
    /// Natural key of the link rule
    #[arg(long)]
    pub key: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub link_type_key: Option<String>,
    #[arg(long)]
    pub start_item_type_key: Option<String>,
    #[arg(long)]
    pub end_item_type_key: Option<String>,
    #[arg(long, value_enum, default_value_t)]
    pub state: State,
}

/// Arguments for resources that only carry a name and description
#[derive(Args, Debug)]
pub struct NamedArgs {
    /// Natural key of the resource
    #[arg(long)]
    pub key: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, value_enum, default_value_t)]
    pub state: State,
}
