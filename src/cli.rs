use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "towersim", about = "Interactive control-tower simulation")]
pub struct Args {
    /// Number of runways the tower manages
    #[arg(short = 'r', long = "runways", default_value_t = 2)]
    pub runways: u32,

    /// Pre-register this many aircraft with randomized flight plans
    #[arg(short = 'd', long = "demo", default_value_t = 0)]
    pub demo: usize,

    /// RNG seed for the demo fleet
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,
}
