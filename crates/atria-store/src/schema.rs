//! Sqlite schema for the contract domain.
//!
//! The partial unique index on `contract_requests` is what makes the
//! single-pending-request invariant atomic: a second concurrent insert
//! for the same `(property_id, requester_id)` pair fails at the storage
//! layer and surfaces as `Conflict`.

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS properties (
    id            TEXT PRIMARY KEY,
    owner_id      TEXT NOT NULL,
    origin        TEXT NOT NULL CHECK (origin IN ('platform', 'captured')),
    price_cents   INTEGER NOT NULL CHECK (price_cents > 0),
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contract_requests (
    id              TEXT PRIMARY KEY,
    property_id     TEXT NOT NULL REFERENCES properties(id),
    requester_id    TEXT NOT NULL,
    owner_id        TEXT NOT NULL,
    message         TEXT NOT NULL,
    experience      TEXT,
    references_text TEXT,
    status          TEXT NOT NULL CHECK (status IN ('pending', 'approved', 'rejected')),
    created_at      TEXT NOT NULL,
    decided_at      TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_requests_single_pending
    ON contract_requests(property_id, requester_id)
    WHERE status = 'pending';

CREATE INDEX IF NOT EXISTS idx_requests_property
    ON contract_requests(property_id);

CREATE TABLE IF NOT EXISTS contracts (
    id                   TEXT PRIMARY KEY,
    property_id          TEXT NOT NULL REFERENCES properties(id),
    captador_id          TEXT,
    partner_id           TEXT NOT NULL,
    contract_type        TEXT NOT NULL CHECK (contract_type IN ('platform', 'external')),
    captador_percentage  INTEGER NOT NULL,
    partner_percentage   INTEGER NOT NULL,
    platform_percentage  INTEGER NOT NULL,
    total_commission_bp  INTEGER NOT NULL,
    property_value_cents INTEGER NOT NULL CHECK (property_value_cents > 0),
    terms_and_conditions TEXT,
    status               TEXT NOT NULL
        CHECK (status IN ('pending', 'signed', 'active', 'completed', 'rejected')),
    signed_at            TEXT,
    created_at           TEXT NOT NULL,
    CHECK (captador_percentage + partner_percentage + platform_percentage = 100)
);

CREATE INDEX IF NOT EXISTS idx_contracts_property
    ON contracts(property_id);

CREATE TABLE IF NOT EXISTS commission_repayments (
    id               TEXT PRIMARY KEY,
    contract_id      TEXT NOT NULL REFERENCES contracts(id),
    property_id      TEXT NOT NULL,
    captador_id      TEXT,
    amount_due_cents INTEGER NOT NULL CHECK (amount_due_cents > 0),
    due_date         TEXT NOT NULL,
    status           TEXT NOT NULL CHECK (status IN ('outstanding', 'paid')),
    created_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_repayments_captador
    ON commission_repayments(captador_id);
";
