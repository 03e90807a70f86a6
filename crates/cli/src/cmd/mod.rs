mod games;
mod import;
mod show;

pub use games::cmd_games_add;
pub use import::{ImportArgs, cmd_import};
pub use show::cmd_show;
