use clap::{Parser, Subcommand};
use medchain_core::{CoreConfig, RecordStore};
use medchain_hash::{
    decode_type_prefix, encode_hash_for_tag, label_for_hash, HashType, Payload,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "medchain")]
#[command(about = "MedChain medical record and audit hash CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode or decode audit hashes
    Hash {
        #[command(subcommand)]
        action: HashAction,
    },
    /// List doctors in the demo store
    Doctors,
    /// List a doctor's patients
    Patients {
        /// Doctor id (e.g. doc-1)
        doctor_id: String,
    },
    /// List a doctor's medical records
    Records {
        /// Doctor id (e.g. doc-1)
        doctor_id: String,
    },
    /// Show the audit trail of a medical record
    Audit {
        /// Medical record id (e.g. mr-1)
        record_id: String,
    },
}

#[derive(Subcommand)]
enum HashAction {
    /// Generate an audit hash for a payload
    Encode {
        /// Hash type tag (RECORD, CONSULTATION, DIAGNOSTIC, PRESCRIPTION, CERTIFICATE, FILE)
        hash_type: String,
        /// Payload field as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Decode the type prefix of a stored hash
    Decode {
        /// Stored audit hash
        hash: String,
    },
    /// List hash types with their prefixes and labels
    Types,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn demo_store() -> Result<RecordStore, Box<dyn std::error::Error>> {
    Ok(RecordStore::new(Arc::new(CoreConfig::default()))?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Hash { action }) => match action {
            HashAction::Encode { hash_type, fields } => {
                let payload = fields
                    .into_iter()
                    .fold(Payload::new(), |p, (k, v)| p.with(k, v));
                println!("{}", encode_hash_for_tag(&hash_type, &payload));
            }
            HashAction::Decode { hash } => match decode_type_prefix(&hash) {
                Some(prefix) => println!("{prefix}: {}", label_for_hash(&hash)),
                None => println!("Unrecognised hash: {}", label_for_hash(&hash)),
            },
            HashAction::Types => {
                for t in HashType::ALL {
                    println!("{:<13} {:<5} {}", t.tag(), t.prefix(), t.label());
                }
            }
        },
        Some(Commands::Doctors) => {
            let store = demo_store()?;
            for doctor in store.doctors() {
                println!(
                    "ID: {}, Name: {}, CRM: {}, Specialty: {}",
                    doctor.id, doctor.full_name, doctor.crm, doctor.specialty
                );
            }
        }
        Some(Commands::Patients { doctor_id }) => {
            let store = demo_store()?;
            let patients = store.patients_by_doctor(&doctor_id);
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in patients {
                    println!(
                        "ID: {}, Name: {}, Email: {}, Created: {}",
                        patient.id, patient.full_name, patient.email, patient.created_date
                    );
                }
            }
        }
        Some(Commands::Records { doctor_id }) => {
            let store = demo_store()?;
            let records = store.records_by_doctor(&doctor_id);
            if records.is_empty() {
                println!("No medical records found.");
            } else {
                for record in records {
                    println!(
                        "ID: {}, Patient: {}, Hash: {}, Updated: {}",
                        record.id, record.patient_id, record.hash, record.updated_date
                    );
                }
            }
        }
        Some(Commands::Audit { record_id }) => {
            let store = demo_store()?;
            match store.audit_trail(&record_id) {
                Ok(trail) => println!("{}", serde_json::to_string_pretty(&trail)?),
                Err(e) => eprintln!("Error reading audit trail: {}", e),
            }
        }
        None => {
            println!("Use 'medchain --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_splits_on_first_equals() {
        assert_eq!(
            parse_field("diagnosis=a=b").unwrap(),
            ("diagnosis".to_string(), "a=b".to_string())
        );
        assert!(parse_field("novalue").is_err());
        assert!(parse_field(" =x").is_err());
    }

    #[test]
    fn cli_parses_encode_fields() {
        let cli = Cli::try_parse_from([
            "medchain",
            "hash",
            "encode",
            "FILE",
            "--field",
            "format=PDF",
            "--field",
            "description=Blood test",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Hash {
                action: HashAction::Encode { hash_type, fields },
            }) => {
                assert_eq!(hash_type, "FILE");
                assert_eq!(fields.len(), 2);
            }
            _ => panic!("expected hash encode"),
        }
    }
}
