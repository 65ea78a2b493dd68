// Applies schema.sql and seeds the reference data: the sample doctor roster,
// the medicine catalog, and a starter ward set. Safe to run repeatedly.

use hms_server::auth;
use hms_server::config::Config;
use hms_server::db;

use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

const SCHEMA: &str = include_str!("../../schema.sql");

/// Every seeded doctor logs in with this until they change it.
const DEFAULT_PASSWORD: &str = "password123";

const DOCTORS: &[(&str, &str, &str, &str)] = &[
    ("Dr. Sarah Johnson", "Cardiology", "9876543210", "sarah.johnson@hospital.com"),
    ("Dr. Michael Chen", "Neurology", "9876543211", "michael.chen@hospital.com"),
    ("Dr. Emily Rodriguez", "Orthopedics", "9876543212", "emily.rodriguez@hospital.com"),
    ("Dr. James Wilson", "Dermatology", "9876543213", "james.wilson@hospital.com"),
    ("Dr. Priya Sharma", "Pediatrics", "9876543214", "priya.sharma@hospital.com"),
    ("Dr. Robert Brown", "General", "9876543215", "robert.brown@hospital.com"),
    ("Dr. Lisa Anderson", "Cardiology", "9876543216", "lisa.anderson@hospital.com"),
    ("Dr. David Kumar", "Neurology", "9876543217", "david.kumar@hospital.com"),
    ("Dr. Maria Garcia", "Orthopedics", "9876543218", "maria.garcia@hospital.com"),
    ("Dr. John Smith", "General", "9876543219", "john.smith@hospital.com"),
];

const MEDICINES: &[(&str, &str, f64, i32, &str, &str)] = &[
    ("Paracetamol 500mg", "Pain Relief", 25.00, 500, "PharmaCorp", "For fever and mild to moderate pain"),
    ("Amoxicillin 250mg", "Antibiotic", 45.00, 300, "MedTech", "Broad-spectrum antibiotic"),
    ("Cough Syrup 100ml", "Cough & Cold", 120.00, 200, "HealthCare", "Relieves dry and wet cough"),
    ("Antacid Tablets", "Digestive", 35.00, 400, "PharmaCorp", "For acidity and heartburn"),
    ("Cetirizine 10mg", "Antihistamine", 28.00, 350, "MedTech", "For allergies and itching"),
    ("Dolo 650", "Pain Relief", 30.00, 450, "HealthCare", "For severe pain and fever"),
    ("Azithromycin 250mg", "Antibiotic", 85.00, 250, "PharmaCorp", "For bacterial infections"),
    ("Vitamin D3 60000IU", "Vitamins", 150.00, 180, "MedTech", "Bone health and immunity"),
    ("Ciprofloxacin 500mg", "Antibiotic", 65.00, 220, "HealthCare", "For urinary and respiratory infections"),
    ("Omeprazole 20mg", "Digestive", 42.00, 320, "PharmaCorp", "For GERD and acid reflux"),
    ("Ibuprofen 400mg", "Pain Relief", 40.00, 380, "MedTech", "Anti-inflammatory and pain relief"),
    ("Augmentin 625mg", "Antibiotic", 95.00, 200, "HealthCare", "For severe bacterial infections"),
    ("Losartan 50mg", "Blood Pressure", 55.00, 280, "PharmaCorp", "For hypertension"),
    ("Metformin 500mg", "Diabetes", 38.00, 420, "MedTech", "For type 2 diabetes management"),
    ("Atorvastatin 10mg", "Heart Health", 48.00, 300, "HealthCare", "Cholesterol management"),
];

const WARDS: &[(&str, i32)] = &[
    ("General Ward A", 20),
    ("General Ward B", 20),
    ("ICU", 8),
    ("Maternity Ward", 12),
    ("Pediatric Ward", 15),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env();
    let pool = db::connect_pg(&cfg.database_url).await?;

    sqlx::raw_sql(SCHEMA).execute(&pool).await?;
    tracing::info!("schema applied");

    seed_doctors(&pool).await?;
    seed_medicines(&pool).await?;
    seed_wards(&pool).await?;

    tracing::info!("database ready");
    Ok(())
}

async fn seed_doctors(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM doctor"#)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        tracing::info!("doctors already present, skipping");
        return Ok(());
    }

    // Same starter password for every sample account, hashed once.
    let hash = auth::hash_password(DEFAULT_PASSWORD).map_err(anyhow::Error::msg)?;
    for &(name, specialization, contact, email) in DOCTORS {
        sqlx::query(
            r#"
            INSERT INTO doctor (name, specialization, contact, email, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(name)
        .bind(specialization)
        .bind(contact)
        .bind(email)
        .bind(&hash)
        .execute(pool)
        .await?;
    }
    tracing::info!("seeded {} doctors", DOCTORS.len());
    Ok(())
}

async fn seed_medicines(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM medicine"#)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        tracing::info!("medicines already present, skipping");
        return Ok(());
    }

    for &(name, category, price, stock, manufacturer, description) in MEDICINES {
        sqlx::query(
            r#"
            INSERT INTO medicine (name, category, price, stock, manufacturer, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(price)
        .bind(stock)
        .bind(manufacturer)
        .bind(description)
        .execute(pool)
        .await?;
    }
    tracing::info!("seeded {} medicines", MEDICINES.len());
    Ok(())
}

async fn seed_wards(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM ward"#)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        tracing::info!("wards already present, skipping");
        return Ok(());
    }

    for &(name, capacity) in WARDS {
        sqlx::query(
            r#"
            INSERT INTO ward (ward_name, capacity)
            VALUES ($1, $2)
            "#,
        )
        .bind(name)
        .bind(capacity)
        .execute(pool)
        .await?;
    }
    tracing::info!("seeded {} wards", WARDS.len());
    Ok(())
}
