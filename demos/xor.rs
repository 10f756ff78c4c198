use online_nn::{DataSet, Network, NetworkConfig};

const MAX_EPOCHS: u64 = 1_000_000;

fn main() -> online_nn::Result<()> {
    env_logger::init();

    let data = DataSet::xor();
    // 2 inputs -> 4 hidden -> 1 output
    let mut network = Network::new(NetworkConfig::with_layers(2, 4, 1, 1).seed(8));
    network.initialize()?;

    while !network.has_learned_enough() && network.epoch() < MAX_EPOCHS {
        network.train_once(&data)?;
        if network.epoch() % 10_000 == 0 {
            println!("Epoch {}: error = {:.4}%", network.epoch(), network.error_percentage());
        }
    }
    if network.has_learned_enough() {
        println!("Learned XOR after {} epochs", network.epoch());
    } else {
        println!(
            "Gave up after {} epochs, error still {:.4}%",
            network.epoch(),
            network.error_percentage()
        );
    }

    for sample in data.samples() {
        network.feed_forward(&sample.input)?;
        println!(
            "Input: {:?} -> Output: {:.4} (expected {})",
            sample.input,
            network.outputs()[0],
            sample.target[0]
        );
    }
    Ok(())
}
