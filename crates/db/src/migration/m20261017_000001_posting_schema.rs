//! Contract revenue posting schema.
//!
//! Creates the chart of accounts, role mappings, journal tables, contracts
//! and document sequences, and seeds the account role catalog.

use fleetledger_core::posting::AccountRoleRegistry;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend, Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS & ROLE MAPPINGS
        // ============================================================
        db.execute_unprepared(CHART_OF_ACCOUNTS_SQL).await?;
        db.execute_unprepared(ACCOUNT_ROLE_TYPES_SQL).await?;
        db.execute_unprepared(ACCOUNT_MAPPINGS_SQL).await?;
        db.execute_unprepared(COST_CENTERS_SQL).await?;

        // ============================================================
        // PART 3: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_LINES_SQL).await?;

        // ============================================================
        // PART 4: CONTRACTS & SEQUENCES
        // ============================================================
        db.execute_unprepared(CONTRACTS_SQL).await?;
        db.execute_unprepared(DOCUMENT_SEQUENCES_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 6: SEED DATA
        // ============================================================
        for def in AccountRoleRegistry::all() {
            db.execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                SEED_ROLE_TYPE_SQL,
                [
                    def.role.code().into(),
                    def.name_en.into(),
                    def.name_ar.into(),
                    def.classification.as_str().into(),
                    def.default_code.into(),
                ],
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_classification AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

CREATE TYPE journal_entry_status AS ENUM ('draft', 'posted');

CREATE TYPE contract_status AS ENUM ('draft', 'active');

CREATE TYPE contract_type AS ENUM (
    'rental',
    'daily_rental',
    'weekly_rental',
    'monthly_rental',
    'yearly_rental',
    'rent_to_own',
    'lease',
    'subscription',
    'corporate',
    'government'
);
";

const CHART_OF_ACCOUNTS_SQL: &str = r"
CREATE TABLE chart_of_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    name_ar VARCHAR(255),
    classification account_classification NOT NULL,
    parent_id UUID REFERENCES chart_of_accounts(id),
    is_header BOOLEAN NOT NULL DEFAULT false,
    is_active BOOLEAN NOT NULL DEFAULT true,
    auto_provisioned BOOLEAN NOT NULL DEFAULT false,
    provisioned_for_role VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chart_of_accounts_tenant_code_key UNIQUE (tenant_id, code)
);

CREATE INDEX idx_coa_reusable ON chart_of_accounts(tenant_id, classification, created_at)
    WHERE is_active = true AND is_header = false;
";

const ACCOUNT_ROLE_TYPES_SQL: &str = r"
CREATE TABLE account_role_types (
    code VARCHAR(50) PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    name_ar VARCHAR(255) NOT NULL,
    classification account_classification NOT NULL,
    default_account_code VARCHAR(20) NOT NULL
);
";

const ACCOUNT_MAPPINGS_SQL: &str = r"
CREATE TABLE account_mappings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL,
    role_code VARCHAR(50) NOT NULL REFERENCES account_role_types(code),
    ledger_account_id UUID NOT NULL REFERENCES chart_of_accounts(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- At most one active mapping per role
CREATE UNIQUE INDEX account_mappings_active_role_key
    ON account_mappings(tenant_id, role_code)
    WHERE is_active;
";

const COST_CENTERS_SQL: &str = r"
CREATE TABLE cost_centers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL,
    code VARCHAR(50) NOT NULL,
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (tenant_id, code)
);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL,
    entry_number VARCHAR(50) NOT NULL,
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    reference_type VARCHAR(50),
    reference_id UUID,
    total_debit NUMERIC(19, 3) NOT NULL,
    total_credit NUMERIC(19, 3) NOT NULL,
    status journal_entry_status NOT NULL DEFAULT 'posted',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT journal_entries_tenant_number_key UNIQUE (tenant_id, entry_number),
    CONSTRAINT journal_entries_balanced CHECK (total_debit = total_credit)
);

CREATE INDEX idx_journal_entries_reference ON journal_entries(reference_type, reference_id);
";

const JOURNAL_ENTRY_LINES_SQL: &str = r"
CREATE TABLE journal_entry_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES chart_of_accounts(id),
    cost_center_id UUID REFERENCES cost_centers(id),
    line_number INTEGER NOT NULL,
    line_description TEXT NOT NULL,
    debit_amount NUMERIC(19, 3) NOT NULL DEFAULT 0,
    credit_amount NUMERIC(19, 3) NOT NULL DEFAULT 0,
    UNIQUE (journal_entry_id, line_number),
    CONSTRAINT journal_entry_lines_one_side CHECK (
        debit_amount >= 0
        AND credit_amount >= 0
        AND (debit_amount > 0) <> (credit_amount > 0)
    )
);

CREATE INDEX idx_journal_entry_lines_account ON journal_entry_lines(account_id);
";

const CONTRACTS_SQL: &str = r"
CREATE TABLE contracts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL,
    contract_number VARCHAR(50) NOT NULL,
    customer_id UUID NOT NULL,
    vehicle_id UUID,
    contract_type contract_type NOT NULL,
    contract_date DATE NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    contract_amount NUMERIC(19, 3) NOT NULL,
    monthly_amount NUMERIC(19, 3),
    description TEXT,
    terms TEXT,
    status contract_status NOT NULL DEFAULT 'draft',
    journal_entry_id UUID REFERENCES journal_entries(id),
    requires_manual_entry BOOLEAN NOT NULL DEFAULT false,
    posting_error TEXT,
    created_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT contracts_tenant_number_key UNIQUE (tenant_id, contract_number),
    CONSTRAINT contracts_date_range CHECK (end_date >= start_date),
    CONSTRAINT contracts_active_has_entry CHECK (status <> 'active' OR journal_entry_id IS NOT NULL)
);

CREATE INDEX idx_contracts_manual_entry ON contracts(tenant_id) WHERE requires_manual_entry;
";

const DOCUMENT_SEQUENCES_SQL: &str = r"
CREATE TABLE document_sequences (
    tenant_id UUID NOT NULL,
    scope VARCHAR(100) NOT NULL,
    last_value BIGINT NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (tenant_id, scope)
);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_journal_entry_balance
-- Line sums must equal the header totals at commit
-- ============================================================
CREATE OR REPLACE FUNCTION check_journal_entry_balance()
RETURNS TRIGGER AS $$
DECLARE
    line_debit NUMERIC(19, 3);
    line_credit NUMERIC(19, 3);
    header_debit NUMERIC(19, 3);
    header_credit NUMERIC(19, 3);
BEGIN
    SELECT total_debit, total_credit
    INTO header_debit, header_credit
    FROM journal_entries
    WHERE id = NEW.journal_entry_id;

    SELECT
        COALESCE(SUM(debit_amount), 0),
        COALESCE(SUM(credit_amount), 0)
    INTO line_debit, line_credit
    FROM journal_entry_lines
    WHERE journal_entry_id = NEW.journal_entry_id;

    IF line_debit <> header_debit OR line_credit <> header_credit THEN
        RAISE EXCEPTION 'Journal entry % lines (%/%) do not match header (%/%)',
            NEW.journal_entry_id, line_debit, line_credit, header_debit, header_credit;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_journal_entry_balance
AFTER INSERT OR UPDATE ON journal_entry_lines
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_journal_entry_balance();

-- ============================================================
-- FUNCTION: set_updated_at
-- ============================================================
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_chart_of_accounts_updated_at
BEFORE UPDATE ON chart_of_accounts
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_account_mappings_updated_at
BEFORE UPDATE ON account_mappings
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_contracts_updated_at
BEFORE UPDATE ON contracts
FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const SEED_ROLE_TYPE_SQL: &str = r"
INSERT INTO account_role_types (code, name, name_ar, classification, default_account_code)
VALUES ($1, $2, $3, $4::account_classification, $5)
ON CONFLICT (code) DO NOTHING
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS contracts CASCADE;
DROP TABLE IF EXISTS journal_entry_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS document_sequences CASCADE;
DROP TABLE IF EXISTS account_mappings CASCADE;
DROP TABLE IF EXISTS account_role_types CASCADE;
DROP TABLE IF EXISTS cost_centers CASCADE;
DROP TABLE IF EXISTS chart_of_accounts CASCADE;

DROP FUNCTION IF EXISTS check_journal_entry_balance() CASCADE;
DROP FUNCTION IF EXISTS set_updated_at() CASCADE;

DROP TYPE IF EXISTS contract_type;
DROP TYPE IF EXISTS contract_status;
DROP TYPE IF EXISTS journal_entry_status;
DROP TYPE IF EXISTS account_classification;
";
