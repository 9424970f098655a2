use asc_reconstruct::{
    config::ReconstructConfig, converter::reconstruct, detection_models::Detection,
    writer::to_asc_string,
};
use std::{path::Path, time::Instant};

#[tokio::main]
async fn main() {
    // A voltage source driving an RC loop, as a detector would report it.
    let detections = vec![
        Detection::new("junction", 100.0, 100.0),
        Detection::new("junction", 400.0, 100.0),
        Detection::new("junction", 100.0, 400.0),
        Detection::new("junction", 400.0, 400.0),
        Detection::new("resistor", 250.0, 110.0),
        Detection::new("capacitor-unpolarized", 410.0, 250.0),
        Detection::new("voltage-dc", 100.0, 250.0),
        Detection::new("gnd", 250.0, 450.0),
    ];

    let start_time = Instant::now();
    let schematic = match reconstruct(&detections, &ReconstructConfig::default()) {
        Ok(schematic) => schematic,
        Err(e) => {
            eprintln!("Error reconstructing schematic: {}", e);
            return;
        }
    };
    println!("{}", to_asc_string(&schematic));
    println!("Reconstructed in : {:?}\n", start_time.elapsed());

    let out_dir = Path::new("demo_output");
    if let Err(e) = std::fs::create_dir_all(out_dir)
        .and_then(|_| std::fs::write(out_dir.join("rc_loop.asc"), to_asc_string(&schematic)))
    {
        eprintln!("Error writing demo input: {}", e);
        return;
    }

    match asc_reconstruct::convert_asc_file(&out_dir.join("rc_loop.asc"), &out_dir.join("converted")).await {
        Ok(parsed) => println!(
            "Converted rc_loop.asc: {} components, {} wires, {} flags",
            parsed.components.len(),
            parsed.wires.len(),
            parsed.flags.len()
        ),
        Err(e) => eprintln!("Error converting ASC file: {}", e),
    }
}
