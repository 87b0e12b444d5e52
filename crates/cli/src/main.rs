fn main() -> anyhow::Result<()> {
    arkres_cli::run()
}
