fn main() -> anyhow::Result<()> {
    sparkadvisor::run()
}
