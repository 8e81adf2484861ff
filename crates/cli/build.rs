use std::{env, fs, path::PathBuf};

fn flag(name: &'static str, help: &'static str) -> clap::Arg {
    clap::Arg::new(name).long(name).action(clap::ArgAction::SetTrue).help(help)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };
    let completions_dir = out_dir.join("completions");

    if let Err(e) = fs::create_dir_all(&completions_dir) {
        println!("cargo:warning=Could not create completions directory: {}", e);
        return;
    }

    let mut cmd = clap::Command::new("readable")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract the main article from web pages")
        .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (html, text, json)")
                .value_name("FORMAT")
                .default_value("text")
                .value_parser(["html", "text", "json"]),
        )
        .arg(clap::arg!(--title "Put the title above the text (text only)"))
        .arg(clap::arg!(--width <COLS> "Wrap text at this many characters").default_value("0"))
        .arg(
            clap::Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Base URL for resolving links when reading a file or stdin"),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(
            clap::Arg::new("user-agent")
                .long("user-agent")
                .value_name("UA")
                .help("Custom User-Agent for HTTP requests"),
        )
        .args([
            flag("keep-unlikely", "Keep elements whose class/id look like page chrome"),
            flag("clean-headers", "Remove headings that look like page chrome"),
            flag("collapse-breaks", "Collapse runs of line breaks"),
            flag("no-resolve-links", "Keep links and image sources as they appear in the page"),
        ])
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    let shells = [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ];
    for shell in shells {
        if let Err(e) = clap_complete::generate_to(shell, &mut cmd, "readable", &completions_dir) {
            println!("cargo:warning=Could not generate {} completions: {}", shell, e);
        }
    }
}
