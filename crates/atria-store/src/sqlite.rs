// SPDX-License-Identifier: Apache-2.0

use crate::schema::SCHEMA;
use async_trait::async_trait;
use atria_core::{
    ContractFilter, ContractStats, ContractStore, CoreError, Page, RepaymentFilter, RequestFilter,
};
use atria_model::{
    CommissionRepayment, Contract, ContractId, ContractRequest, ContractStatus, ContractType,
    Money, Property, PropertyId, PropertyOrigin, RepaymentId, RepaymentStatus, RequestId,
    RequestStatus, UserId,
};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::error;

/// Durable `ContractStore` backed by a single sqlite connection.
///
/// The connection sits behind an async mutex; every operation is one
/// statement or one explicit transaction, so a poisoned half-written
/// state is never observable.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(|e| open_err(path, &e))?;
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| open_err(path, &e))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::dependency(format!("sqlite open failed: {e}")))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| CoreError::dependency(format!("sqlite open failed: {e}")))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, CoreError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| CoreError::dependency(format!("schema init failed: {e}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn open_err(path: &Path, err: &rusqlite::Error) -> CoreError {
    error!(path = %path.display(), error = %err, "sqlite open failed");
    CoreError::dependency(format!("sqlite open failed: {err}"))
}

fn db_err(context: &str, err: &rusqlite::Error) -> CoreError {
    error!(context, error = %err, "sqlite operation failed");
    CoreError::dependency(format!("{context}: {err}"))
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::ConstraintViolation
    )
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CoreError::dependency(format!("corrupt timestamp {raw}: {e}")))
}

fn parse_opt_timestamp(raw: Option<String>) -> Result<Option<DateTime<Utc>>, CoreError> {
    raw.as_deref().map(parse_timestamp).transpose()
}

struct RawRequest {
    id: String,
    property_id: String,
    requester_id: String,
    owner_id: String,
    message: String,
    experience: Option<String>,
    references: Option<String>,
    status: String,
    created_at: String,
    decided_at: Option<String>,
}

fn request_from_raw(raw: RawRequest) -> Result<ContractRequest, CoreError> {
    Ok(ContractRequest {
        id: RequestId::parse(&raw.id)?,
        property_id: PropertyId::parse(&raw.property_id)?,
        requester_id: UserId::parse(&raw.requester_id)?,
        owner_id: UserId::parse(&raw.owner_id)?,
        message: raw.message,
        experience: raw.experience,
        references: raw.references,
        status: RequestStatus::parse(&raw.status)?,
        created_at: parse_timestamp(&raw.created_at)?,
        decided_at: parse_opt_timestamp(raw.decided_at)?,
    })
}

struct RawContract {
    id: String,
    property_id: String,
    captador_id: Option<String>,
    partner_id: String,
    contract_type: String,
    captador_percentage: i64,
    partner_percentage: i64,
    platform_percentage: i64,
    total_commission_bp: i64,
    property_value_cents: i64,
    terms_and_conditions: Option<String>,
    status: String,
    signed_at: Option<String>,
    created_at: String,
}

fn contract_from_raw(raw: RawContract) -> Result<Contract, CoreError> {
    let percentage = |value: i64| -> Result<u8, CoreError> {
        u8::try_from(value)
            .map_err(|_| CoreError::dependency(format!("corrupt percentage: {value}")))
    };
    Ok(Contract {
        id: ContractId::parse(&raw.id)?,
        property_id: PropertyId::parse(&raw.property_id)?,
        captador_id: raw
            .captador_id
            .as_deref()
            .map(UserId::parse)
            .transpose()?,
        partner_id: UserId::parse(&raw.partner_id)?,
        contract_type: ContractType::parse(&raw.contract_type)?,
        captador_percentage: percentage(raw.captador_percentage)?,
        partner_percentage: percentage(raw.partner_percentage)?,
        platform_percentage: percentage(raw.platform_percentage)?,
        total_commission_bp: u16::try_from(raw.total_commission_bp)
            .map_err(|_| CoreError::dependency("corrupt commission rate".to_string()))?,
        property_value: Money::from_cents(raw.property_value_cents),
        terms_and_conditions: raw.terms_and_conditions,
        status: ContractStatus::parse(&raw.status)?,
        signed_at: parse_opt_timestamp(raw.signed_at)?,
        created_at: parse_timestamp(&raw.created_at)?,
    })
}

/// Upper bound for the stats scan; far above any realistic row count for
/// one aggregate read.
const STATS_SCAN_LIMIT: usize = 1_000_000;

const REQUEST_COLUMNS: &str = "id, property_id, requester_id, owner_id, message, experience, \
     references_text, status, created_at, decided_at";

const CONTRACT_COLUMNS: &str = "id, property_id, captador_id, partner_id, contract_type, \
     captador_percentage, partner_percentage, platform_percentage, total_commission_bp, \
     property_value_cents, terms_and_conditions, status, signed_at, created_at";

#[async_trait]
impl ContractStore for SqliteStore {
    async fn insert_property(&self, property: &Property) -> Result<(), CoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO properties (id, owner_id, origin, price_cents, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                property.id.as_str(),
                property.owner_id.as_str(),
                property.origin.as_str(),
                property.price.cents(),
                property.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                CoreError::conflict(format!("property {} already exists", property.id.as_str()))
            } else {
                db_err("insert property", &e)
            }
        })?;
        Ok(())
    }

    async fn get_property(&self, id: &PropertyId) -> Result<Option<Property>, CoreError> {
        let conn = self.conn.lock().await;
        let raw = conn
            .query_row(
                "SELECT id, owner_id, origin, price_cents, created_at \
                 FROM properties WHERE id = ?1",
                params![id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(db_err("get property", &other)),
            })?;
        let Some((id, owner_id, origin, price_cents, created_at)) = raw else {
            return Ok(None);
        };
        Ok(Some(Property {
            id: PropertyId::parse(&id)?,
            owner_id: UserId::parse(&owner_id)?,
            origin: PropertyOrigin::parse(&origin)?,
            price: Money::from_cents(price_cents),
            created_at: parse_timestamp(&created_at)?,
        }))
    }

    async fn insert_pending_request(&self, request: &ContractRequest) -> Result<(), CoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO contract_requests \
             (id, property_id, requester_id, owner_id, message, experience, references_text, \
              status, created_at, decided_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL)",
            params![
                request.id.as_str(),
                request.property_id.as_str(),
                request.requester_id.as_str(),
                request.owner_id.as_str(),
                request.message,
                request.experience,
                request.references,
                RequestStatus::Pending.as_str(),
                request.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                CoreError::conflict(
                    "a pending request already exists for this property and requester",
                )
            } else {
                db_err("insert contract request", &e)
            }
        })?;
        Ok(())
    }

    async fn get_request(&self, id: &RequestId) -> Result<Option<ContractRequest>, CoreError> {
        let conn = self.conn.lock().await;
        let raw = conn
            .query_row(
                &format!("SELECT {REQUEST_COLUMNS} FROM contract_requests WHERE id = ?1"),
                params![id.as_str()],
                |row| {
                    Ok(RawRequest {
                        id: row.get(0)?,
                        property_id: row.get(1)?,
                        requester_id: row.get(2)?,
                        owner_id: row.get(3)?,
                        message: row.get(4)?,
                        experience: row.get(5)?,
                        references: row.get(6)?,
                        status: row.get(7)?,
                        created_at: row.get(8)?,
                        decided_at: row.get(9)?,
                    })
                },
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(db_err("get contract request", &other)),
            })?;
        raw.map(request_from_raw).transpose()
    }

    async fn list_requests(
        &self,
        filter: &RequestFilter,
        page: &Page,
    ) -> Result<Vec<ContractRequest>, CoreError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(status) = filter.status {
            values.push(Value::Text(status.as_str().to_string()));
            clauses.push(format!("status = ?{}", values.len()));
        }
        if let Some(property_id) = &filter.property_id {
            values.push(Value::Text(property_id.as_str().to_string()));
            clauses.push(format!("property_id = ?{}", values.len()));
        }
        if let Some(user_id) = &filter.user_id {
            values.push(Value::Text(user_id.as_str().to_string()));
            let n = values.len();
            clauses.push(format!("(requester_id = ?{n} OR owner_id = ?{n})"));
        }
        let mut sql = format!("SELECT {REQUEST_COLUMNS} FROM contract_requests");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        values.push(Value::Integer(page.limit as i64));
        let limit_n = values.len();
        values.push(Value::Integer(page.offset() as i64));
        let offset_n = values.len();
        sql.push_str(&format!(
            " ORDER BY created_at DESC, id ASC LIMIT ?{limit_n} OFFSET ?{offset_n}"
        ));

        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| db_err("list contract requests", &e))?;
        let rows = stmt
            .query_map(params_from_iter(values), |row| {
                Ok(RawRequest {
                    id: row.get(0)?,
                    property_id: row.get(1)?,
                    requester_id: row.get(2)?,
                    owner_id: row.get(3)?,
                    message: row.get(4)?,
                    experience: row.get(5)?,
                    references: row.get(6)?,
                    status: row.get(7)?,
                    created_at: row.get(8)?,
                    decided_at: row.get(9)?,
                })
            })
            .map_err(|e| db_err("list contract requests", &e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| db_err("list contract requests", &e))?;
        rows.into_iter().map(request_from_raw).collect()
    }

    async fn reject_request(
        &self,
        id: &RequestId,
        decided_at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let conn = self.conn.lock().await;
        let rows = conn
            .execute(
                "UPDATE contract_requests SET status = 'rejected', decided_at = ?1 \
                 WHERE id = ?2 AND status = 'pending'",
                params![decided_at.to_rfc3339(), id.as_str()],
            )
            .map_err(|e| db_err("reject contract request", &e))?;
        if rows == 0 {
            return Err(CoreError::invalid_state(format!(
                "request {} is not pending",
                id.as_str()
            )));
        }
        Ok(())
    }

    async fn approve_request_and_insert_contract(
        &self,
        id: &RequestId,
        decided_at: DateTime<Utc>,
        contract: &Contract,
    ) -> Result<(), CoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| db_err("approve transaction begin", &e))?;
        let rows = tx
            .execute(
                "UPDATE contract_requests SET status = 'approved', decided_at = ?1 \
                 WHERE id = ?2 AND status = 'pending'",
                params![decided_at.to_rfc3339(), id.as_str()],
            )
            .map_err(|e| db_err("approve contract request", &e))?;
        if rows == 0 {
            // Dropping the transaction rolls back.
            return Err(CoreError::invalid_state(format!(
                "request {} is not pending",
                id.as_str()
            )));
        }
        insert_contract_stmt(&tx, contract)?;
        tx.commit()
            .map_err(|e| db_err("approve transaction commit", &e))?;
        Ok(())
    }

    async fn insert_contract(&self, contract: &Contract) -> Result<(), CoreError> {
        let conn = self.conn.lock().await;
        insert_contract_stmt(&conn, contract)
    }

    async fn get_contract(&self, id: &ContractId) -> Result<Option<Contract>, CoreError> {
        let conn = self.conn.lock().await;
        let raw = conn
            .query_row(
                &format!("SELECT {CONTRACT_COLUMNS} FROM contracts WHERE id = ?1"),
                params![id.as_str()],
                contract_row,
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(db_err("get contract", &other)),
            })?;
        raw.map(contract_from_raw).transpose()
    }

    async fn list_contracts(
        &self,
        filter: &ContractFilter,
        page: &Page,
    ) -> Result<Vec<Contract>, CoreError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(status) = filter.status {
            values.push(Value::Text(status.as_str().to_string()));
            clauses.push(format!("status = ?{}", values.len()));
        }
        if let Some(property_id) = &filter.property_id {
            values.push(Value::Text(property_id.as_str().to_string()));
            clauses.push(format!("property_id = ?{}", values.len()));
        }
        if let Some(party) = &filter.party {
            values.push(Value::Text(party.as_str().to_string()));
            let n = values.len();
            clauses.push(format!("(captador_id = ?{n} OR partner_id = ?{n})"));
        }
        let mut sql = format!("SELECT {CONTRACT_COLUMNS} FROM contracts");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        values.push(Value::Integer(page.limit as i64));
        let limit_n = values.len();
        values.push(Value::Integer(page.offset() as i64));
        let offset_n = values.len();
        sql.push_str(&format!(
            " ORDER BY created_at DESC, id ASC LIMIT ?{limit_n} OFFSET ?{offset_n}"
        ));

        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&sql).map_err(|e| db_err("list contracts", &e))?;
        let rows = stmt
            .query_map(params_from_iter(values), contract_row)
            .map_err(|e| db_err("list contracts", &e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| db_err("list contracts", &e))?;
        rows.into_iter().map(contract_from_raw).collect()
    }

    async fn contract_stats(&self, scope: &ContractFilter) -> Result<ContractStats, CoreError> {
        let contracts = self
            .list_contracts(
                scope,
                &Page {
                    page: 1,
                    limit: STATS_SCAN_LIMIT,
                },
            )
            .await?;
        Ok(fold_stats(&contracts))
    }

    async fn insert_repayment(&self, repayment: &CommissionRepayment) -> Result<(), CoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO commission_repayments \
             (id, contract_id, property_id, captador_id, amount_due_cents, due_date, status, \
              created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                repayment.id.as_str(),
                repayment.contract_id.as_str(),
                repayment.property_id.as_str(),
                repayment.captador_id.as_ref().map(|c| c.as_str()),
                repayment.amount_due.cents(),
                repayment.due_date.to_rfc3339(),
                repayment.status.as_str(),
                repayment.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                CoreError::conflict(format!(
                    "repayment {} violates a storage constraint",
                    repayment.id.as_str()
                ))
            } else {
                db_err("insert repayment", &e)
            }
        })?;
        Ok(())
    }

    async fn list_repayments(
        &self,
        filter: &RepaymentFilter,
        page: &Page,
    ) -> Result<Vec<CommissionRepayment>, CoreError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(status) = filter.status {
            values.push(Value::Text(status.as_str().to_string()));
            clauses.push(format!("status = ?{}", values.len()));
        }
        if let Some(captador_id) = &filter.captador_id {
            values.push(Value::Text(captador_id.as_str().to_string()));
            clauses.push(format!("captador_id = ?{}", values.len()));
        }
        let mut sql = String::from(
            "SELECT id, contract_id, property_id, captador_id, amount_due_cents, due_date, \
             status, created_at FROM commission_repayments",
        );
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        values.push(Value::Integer(page.limit as i64));
        let limit_n = values.len();
        values.push(Value::Integer(page.offset() as i64));
        let offset_n = values.len();
        sql.push_str(&format!(
            " ORDER BY due_date ASC, id ASC LIMIT ?{limit_n} OFFSET ?{offset_n}"
        ));

        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| db_err("list repayments", &e))?;
        let rows = stmt
            .query_map(params_from_iter(values), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })
            .map_err(|e| db_err("list repayments", &e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| db_err("list repayments", &e))?;
        rows.into_iter()
            .map(
                |(id, contract_id, property_id, captador_id, cents, due, status, created)| {
                    Ok(CommissionRepayment {
                        id: RepaymentId::parse(&id)?,
                        contract_id: ContractId::parse(&contract_id)?,
                        property_id: PropertyId::parse(&property_id)?,
                        captador_id: captador_id.as_deref().map(UserId::parse).transpose()?,
                        amount_due: Money::from_cents(cents),
                        due_date: parse_timestamp(&due)?,
                        status: RepaymentStatus::parse(&status)?,
                        created_at: parse_timestamp(&created)?,
                    })
                },
            )
            .collect()
    }
}

fn contract_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawContract> {
    Ok(RawContract {
        id: row.get(0)?,
        property_id: row.get(1)?,
        captador_id: row.get(2)?,
        partner_id: row.get(3)?,
        contract_type: row.get(4)?,
        captador_percentage: row.get(5)?,
        partner_percentage: row.get(6)?,
        platform_percentage: row.get(7)?,
        total_commission_bp: row.get(8)?,
        property_value_cents: row.get(9)?,
        terms_and_conditions: row.get(10)?,
        status: row.get(11)?,
        signed_at: row.get(12)?,
        created_at: row.get(13)?,
    })
}

fn insert_contract_stmt(conn: &Connection, contract: &Contract) -> Result<(), CoreError> {
    conn.execute(
        "INSERT INTO contracts \
         (id, property_id, captador_id, partner_id, contract_type, captador_percentage, \
          partner_percentage, platform_percentage, total_commission_bp, property_value_cents, \
          terms_and_conditions, status, signed_at, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            contract.id.as_str(),
            contract.property_id.as_str(),
            contract.captador_id.as_ref().map(|c| c.as_str()),
            contract.partner_id.as_str(),
            contract.contract_type.as_str(),
            i64::from(contract.captador_percentage),
            i64::from(contract.partner_percentage),
            i64::from(contract.platform_percentage),
            i64::from(contract.total_commission_bp),
            contract.property_value.cents(),
            contract.terms_and_conditions,
            contract.status.as_str(),
            contract.signed_at.map(|t| t.to_rfc3339()),
            contract.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| {
        if is_constraint_violation(&e) {
            CoreError::conflict(format!(
                "contract {} violates a storage constraint",
                contract.id.as_str()
            ))
        } else {
            db_err("insert contract", &e)
        }
    })?;
    Ok(())
}

pub(crate) fn fold_stats(contracts: &[Contract]) -> ContractStats {
    let mut stats = ContractStats::default();
    let mut commission_cents: i64 = 0;
    let mut value_cents: i64 = 0;
    for contract in contracts {
        stats.total += 1;
        match contract.status {
            ContractStatus::Pending => stats.pending += 1,
            ContractStatus::Signed => stats.signed += 1,
            ContractStatus::Active => stats.active += 1,
            ContractStatus::Completed => stats.completed += 1,
            ContractStatus::Rejected => stats.rejected += 1,
        }
        commission_cents += contract.commission_value().cents();
        value_cents += contract.property_value.cents();
    }
    stats.total_commission = Money::from_cents(commission_cents);
    stats.average_property_value = if stats.total == 0 {
        Money::ZERO
    } else {
        Money::from_cents(value_cents / stats.total as i64)
    };
    stats
}
