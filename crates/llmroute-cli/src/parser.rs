//! Main CLI parser.
//!
//! Provider settings come from the environment (optionally a `.env` file);
//! only the listener and verbosity are flags.

use clap::Parser;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Single-endpoint front door forwarding generation requests to Ollama or
/// an OpenAI-compatible API.
#[derive(Debug, Parser)]
#[command(name = "llmroute")]
#[command(about = "Forward chat generation requests to a configured LLM backend")]
#[command(version)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "LLMROUTE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(short, long, env = "LLMROUTE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Host and port to bind. Hostnames are resolved at bind time; a
    /// bracketed IPv6 literal such as `[::1]` is accepted as well.
    pub fn listen_addr(&self) -> (&str, u16) {
        let host = self
            .host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(&self.host);
        (host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::net::{SocketAddr, ToSocketAddrs};

    use super::*;
    use clap::CommandFactory;

    fn resolve(cli: &Cli) -> Vec<SocketAddr> {
        cli.listen_addr().to_socket_addrs().unwrap().collect()
    }

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["llmroute", "--host", "127.0.0.1", "-p", "9000", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.listen_addr(), ("127.0.0.1", 9000));
        assert_eq!(resolve(&cli), vec!["127.0.0.1:9000".parse().unwrap()]);
    }

    #[test]
    fn test_ipv6_host() {
        let cli = Cli::parse_from(["llmroute", "--host", "::1"]);
        assert_eq!(resolve(&cli), vec!["[::1]:8000".parse().unwrap()]);

        let bracketed = Cli::parse_from(["llmroute", "--host", "[::1]", "-p", "9000"]);
        assert_eq!(bracketed.listen_addr(), ("::1", 9000));
    }

    #[test]
    fn test_hostname_host() {
        let cli = Cli::parse_from(["llmroute", "--host", "localhost"]);
        assert_eq!(cli.listen_addr(), ("localhost", DEFAULT_PORT));
        let addrs = resolve(&cli);
        assert!(!addrs.is_empty());
        assert!(addrs.iter().all(|a| a.ip().is_loopback() && a.port() == DEFAULT_PORT));
    }
}
