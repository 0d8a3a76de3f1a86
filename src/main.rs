fn main() {
  if let Err(e) = forzudo_lib::run() {
    eprintln!("{e:#}");
    std::process::exit(1);
  }
}
