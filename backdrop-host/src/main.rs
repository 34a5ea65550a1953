use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    backdrop_host_lib::init_tracing();
    let args = backdrop_host_lib::Args::parse();
    backdrop_host_lib::run(args).await
}
