//! CLI commands

mod android;
mod completions;
mod flatpak;
mod generate;
mod show;
mod splash;

pub use android::AndroidCommand;
pub use completions::CompletionsCommand;
pub use flatpak::FlatpakCommand;
pub use generate::GenerateCommand;
pub use show::ShowCommand;
pub use splash::SplashCommand;
