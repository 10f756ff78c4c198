use online_nn::{DataSet, Network, NetworkConfig, NetworkError};

fn trained(seed: u64) -> Network {
    let data = DataSet::xor();
    let mut network = Network::new(NetworkConfig::with_layers(2, 3, 2, 1).seed(seed));
    network.initialize().unwrap();
    for _ in 0..500 {
        network.train_once(&data).unwrap();
    }
    network
}

fn fresh(seed: u64) -> Network {
    let mut network = Network::new(NetworkConfig::with_layers(2, 3, 2, 1).seed(seed));
    network.initialize().unwrap();
    network
}

#[test]
fn export_import_reproduces_weights_and_outputs() {
    let mut source = trained(1);
    let text = source.export();

    let mut restored = fresh(99);
    assert_ne!(restored.export(), text);
    restored.import(&text).unwrap();
    assert_eq!(restored.export(), text);

    for input in [[0.0, 1.0], [1.0, 1.0], [0.25, 0.5]] {
        source.feed_forward(&input).unwrap();
        restored.feed_forward(&input).unwrap();
        assert_eq!(source.outputs(), restored.outputs());
    }
}

#[test]
fn weights_survive_bit_for_bit() {
    let source = trained(2);
    let mut restored = fresh(3);
    restored.import(&source.export()).unwrap();
    for (a, b) in source.layers().iter().zip(restored.layers()) {
        for (ca, cb) in a.connections().iter().zip(b.connections()) {
            assert_eq!(ca.weight().to_bits(), cb.weight().to_bits());
        }
    }
}

#[test]
fn file_round_trip_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoints").join("xor").join("weights.txt");

    let source = trained(4);
    source.export_to_file(&path).unwrap();
    assert!(path.exists());

    let mut restored = fresh(5);
    assert!(restored.import_from_file(&path).unwrap());
    assert_eq!(restored.export(), source.export());
}

#[test]
fn missing_file_is_a_silent_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let mut network = fresh(6);
    let before = network.export();
    assert!(!network.import_from_file(dir.path().join("absent.txt")).unwrap());
    assert_eq!(network.export(), before);
}

#[test]
fn mismatched_topology_is_rejected() {
    let source = trained(7);

    let mut wider = Network::new(NetworkConfig::with_layers(2, 4, 2, 1).seed(8));
    wider.initialize().unwrap();
    let before = wider.export();
    assert!(matches!(
        wider.import(&source.export()),
        Err(NetworkError::TopologyMismatch { layer: Some(1), expected: 8, actual: 6 })
    ));
    assert_eq!(wider.export(), before);

    let mut deeper = Network::new(NetworkConfig::with_layers(2, 3, 3, 1).seed(8));
    deeper.initialize().unwrap();
    assert!(matches!(
        deeper.import(&source.export()),
        Err(NetworkError::TopologyMismatch { layer: None, expected: 5, actual: 4 })
    ));
}

#[test]
fn garbage_weight_is_rejected() {
    let mut network = Network::new(NetworkConfig::default().seed(9));
    network.initialize().unwrap();
    assert!(matches!(
        network.import("\n0.5e\n"),
        Err(NetworkError::InvalidWeight { layer: 1, .. })
    ));
}
