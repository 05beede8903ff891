use tpa_tct::app::run;
fn main() {
    run().unwrap();
}
