use std::path::Path;

const SYSTEMS_PATH: &str = "systems/crispr_systems.json";

/// IUPAC nucleotide codes accepted in a PAM pattern
const PAM_CODES: &str = "ACGTRYSWKMBDHVN";

fn main() {
    let systems_path = Path::new(SYSTEMS_PATH);
    validate_systems_file(systems_path);
    set_build_dependencies();
}

fn validate_systems_file(systems_path: &Path) {
    assert!(
        systems_path.exists(),
        "\n\nSYSTEMS BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the CRISPR systems catalog before building.\n",
        systems_path.display()
    );

    let contents = std::fs::read_to_string(systems_path).unwrap_or_else(|e| {
        panic!(
            "\n\nSYSTEMS BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            systems_path.display()
        );
    });

    let catalog: serde_json::Value = serde_json::from_str(&contents).unwrap_or_else(|e| {
        panic!(
            "\n\nSYSTEMS BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            systems_path.display()
        );
    });

    validate_catalog_structure(&catalog);
}

fn validate_catalog_structure(catalog: &serde_json::Value) {
    assert!(
        catalog.is_object(),
        "\n\nSYSTEMS BUILD ERROR: Root must be a JSON object\n\
         Got: {catalog}\n"
    );

    let systems = catalog.get("systems").unwrap_or_else(|| {
        panic!(
            "\n\nSYSTEMS BUILD ERROR: Missing 'systems' field\n\
             The catalog must have a top-level 'systems' object.\n"
        );
    });

    let systems = systems.as_object().unwrap_or_else(|| {
        panic!(
            "\n\nSYSTEMS BUILD ERROR: 'systems' must be an object keyed by system name\n\
             Got: {systems}\n"
        );
    });

    assert!(
        !systems.is_empty(),
        "\n\nSYSTEMS BUILD ERROR: 'systems' is empty\n\
         At least one CRISPR system must be defined.\n"
    );

    for (name, system) in systems {
        validate_system(name, system);
    }

    println!(
        "cargo:warning=Validated systems catalog: {} CRISPR systems",
        systems.len()
    );
}

fn validate_system(name: &str, system: &serde_json::Value) {
    assert!(
        system.get("description").and_then(|v| v.as_str()).is_some(),
        "\n\nSYSTEMS BUILD ERROR: System '{name}' missing 'description' string\n"
    );

    let pam = system
        .get("pam_sequence")
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| {
            panic!("\n\nSYSTEMS BUILD ERROR: System '{name}' missing 'pam_sequence' string\n");
        });

    assert!(
        !pam.is_empty() && pam.chars().all(|c| PAM_CODES.contains(c)),
        "\n\nSYSTEMS BUILD ERROR: System '{name}' has invalid PAM '{pam}'\n\
         PAM sequences must be non-empty, upper-case IUPAC codes ({PAM_CODES}).\n"
    );

    let guide_length = system.get("guide_length").and_then(serde_json::Value::as_u64);
    assert!(
        guide_length.is_some_and(|len| len > 0),
        "\n\nSYSTEMS BUILD ERROR: System '{name}' must have a positive 'guide_length'\n"
    );
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the systems catalog changes
    println!("cargo:rerun-if-changed={SYSTEMS_PATH}");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
