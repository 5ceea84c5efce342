use clap::Parser;

fn main() {
    bmeconv_cli::observability::init();
    let args = bmeconv_cli::Args::parse();
    if let Err(err) = bmeconv_cli::run(&args) {
        tracing::error!("conversion failed: {err:#}");
        std::process::exit(1);
    }
}
