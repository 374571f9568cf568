use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create forms table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS forms (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR(255) NOT NULL,
            url VARCHAR(255) NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            time_start TIME NOT NULL,
            time_end TIME NOT NULL,
            time_duration INTEGER NOT NULL,
            user_id VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT forms_url_key UNIQUE (url),
            CONSTRAINT valid_date_range CHECK (end_date >= start_date),
            CONSTRAINT positive_duration CHECK (time_duration > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create form_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS form_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            form_id UUID NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
            date DATE NOT NULL,
            time_start TIME NOT NULL,
            time_end TIME NOT NULL,
            applicant_id UUID NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT form_slots_applicant_id_key UNIQUE (applicant_id),
            CONSTRAINT form_slots_schedule_key UNIQUE (form_id, date, time_start),
            CONSTRAINT valid_time_range CHECK (time_end > time_start)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Databases created before the slot schedule key existed
    sqlx::query(
        r#"
        DO $$
        BEGIN
            IF NOT EXISTS (
                SELECT 1 FROM pg_constraint WHERE conname = 'form_slots_schedule_key'
            ) THEN
                ALTER TABLE form_slots
                    ADD CONSTRAINT form_slots_schedule_key UNIQUE (form_id, date, time_start);
            END IF;
        END
        $$;
        "#,
    )
    .execute(pool)
    .await?;

    // Create applicants table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS applicants (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NULL,
            phone VARCHAR(64) NULL,
            form_id UUID NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
            form_slot_id UUID NOT NULL REFERENCES form_slots(id) ON DELETE CASCADE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT applicants_form_slot_id_key UNIQUE (form_slot_id),
            CONSTRAINT contact_present CHECK (email IS NOT NULL OR phone IS NOT NULL)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes; one statement per query, prepared statements reject batches
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_forms_user_id ON forms(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_form_slots_form_id ON form_slots(form_id)",
        "CREATE INDEX IF NOT EXISTS idx_applicants_form_id_name ON applicants(form_id, name)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
