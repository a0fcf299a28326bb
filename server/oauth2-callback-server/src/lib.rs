pub mod callback;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod port;

mod server;

pub use callback::{render_callback_page, route, CallbackReply, CALLBACK_PREFIX, CUSTOM_SCHEME_URL};
pub use cli::{parse_args, Cli, CliOutcome, RunArgs};
pub use config::ServerConfig;
pub use error::CallbackError;
pub use port::{resolve_port, LoopbackProbe, PortProbe, DEFAULT_PORT};
pub use server::{BoundServer, CallbackServer};
