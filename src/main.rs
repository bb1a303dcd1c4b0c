fn main() -> Result<(), Box<dyn std::error::Error>> {
    arkchat::cli::main()
}
