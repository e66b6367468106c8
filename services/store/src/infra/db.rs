use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::OnConflict,
};
use uuid::Uuid;

use vitrine_domain::order::OrderStatus;
use vitrine_domain::user::UserRole;
use vitrine_store_schema::{
    app_settings, order_items, orders, payment_hook_deliveries, payment_hooks, products, users,
};

use crate::domain::repository::{
    OrderRepository, PaymentHookRepository, ProductRepository, SettingsRepository, UserRepository,
};
use crate::domain::types::{
    CustomerProfile, HookDelivery, Order, OrderItem, OrderWithItems, PaymentHook, Product,
    ProviderPaymentUpdate, User,
};
use crate::error::StoreError;

// ── Product repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl ProductRepository for DbProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let models = products::Entity::find()
            .order_by_desc(products::Column::UpdatedAt)
            .all(&self.db)
            .await
            .context("list products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn list_by_active(&self, active: bool) -> Result<Vec<Product>, StoreError> {
        let models = products::Entity::find()
            .filter(products::Column::Active.eq(active))
            .order_by_desc(products::Column::UpdatedAt)
            .all(&self.db)
            .await
            .context("list products by active flag")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Product>, StoreError> {
        let model = products::Entity::find()
            .filter(products::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find product by code")?;
        Ok(model.map(product_from_model))
    }

    async fn find_by_codes(&self, codes: &[String]) -> Result<Vec<Product>, StoreError> {
        if codes.is_empty() {
            return Ok(vec![]);
        }
        let models = products::Entity::find()
            .filter(products::Column::Code.is_in(codes.iter().cloned()))
            .all(&self.db)
            .await
            .context("find products by codes")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn create(&self, product: &Product) -> Result<(), StoreError> {
        product_active_model(product)
            .insert(&self.db)
            .await
            .context("create product")?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), StoreError> {
        product_active_model(product)
            .update(&self.db)
            .await
            .context("update product")?;
        Ok(())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), StoreError> {
        products::ActiveModel {
            id: Set(id),
            active: Set(active),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("toggle product")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = products::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete product")?;
        Ok(result.rows_affected > 0)
    }
}

fn product_active_model(product: &Product) -> products::ActiveModel {
    products::ActiveModel {
        id: Set(product.id),
        code: Set(product.code.clone()),
        title: Set(product.title.clone()),
        description: Set(product.description.clone()),
        price_text: Set(product.price_text.clone()),
        price_cents: Set(product.price_cents),
        images: Set(serde_json::json!(product.images)),
        cta_label: Set(product.cta_label.clone()),
        cta_href: Set(product.cta_href.clone()),
        file_url: Set(product.file_url.clone()),
        active: Set(product.active),
        created_at: Set(product.created_at),
        updated_at: Set(product.updated_at),
    }
}

fn product_from_model(model: products::Model) -> Product {
    let images = match model.images {
        serde_json::Value::Array(values) => values
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect(),
        _ => vec![],
    };
    Product {
        id: model.id,
        code: model.code,
        title: model.title,
        description: model.description,
        price_text: model.price_text,
        price_cents: model.price_cents,
        images,
        cta_label: model.cta_label,
        cta_href: model.cta_href,
        file_url: model.file_url,
        active: model.active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), StoreError> {
        let p = &user.profile;
        users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            full_name: Set(p.full_name.clone()),
            cpf: Set(p.cpf.clone()),
            birth_date: Set(p.birth_date),
            phone: Set(p.phone.clone()),
            address_line1: Set(p.address_line1.clone()),
            address_line2: Set(p.address_line2.clone()),
            city: Set(p.city.clone()),
            state: Set(p.state.clone()),
            zip: Set(p.zip.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(i16::from(user.role.as_u8())),
            mfa_enabled: Set(user.mfa_enabled),
            mfa_secret: Set(user.mfa_secret.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, profile: &CustomerProfile) -> Result<(), StoreError> {
        users::ActiveModel {
            id: Set(id),
            full_name: Set(profile.full_name.clone()),
            cpf: Set(profile.cpf.clone()),
            birth_date: Set(profile.birth_date),
            phone: Set(profile.phone.clone()),
            address_line1: Set(profile.address_line1.clone()),
            address_line2: Set(profile.address_line2.clone()),
            city: Set(profile.city.clone()),
            state: Set(profile.state.clone()),
            zip: Set(profile.zip.clone()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user profile")?;
        Ok(())
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        role: UserRole,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        users::ActiveModel {
            id: Set(id),
            role: Set(i16::from(role.as_u8())),
            password_hash: Set(password_hash.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user credentials")?;
        Ok(())
    }

    async fn set_mfa(
        &self,
        id: Uuid,
        enabled: bool,
        secret: Option<&str>,
    ) -> Result<(), StoreError> {
        users::ActiveModel {
            id: Set(id),
            mfa_enabled: Set(enabled),
            mfa_secret: Set(secret.map(str::to_owned)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user mfa")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> Result<User, StoreError> {
    let role = u8::try_from(model.role)
        .ok()
        .and_then(UserRole::from_u8)
        .with_context(|| format!("unknown role {} for user {}", model.role, model.id))?;
    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role,
        profile: CustomerProfile {
            full_name: model.full_name,
            cpf: model.cpf,
            birth_date: model.birth_date,
            phone: model.phone,
            address_line1: model.address_line1,
            address_line2: model.address_line2,
            city: model.city,
            state: model.state,
            zip: model.zip,
        },
        mfa_enabled: model.mfa_enabled,
        mfa_secret: model.mfa_secret,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Order repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl DbOrderRepository {
    /// Attach items to already loaded orders with one `IN` query.
    async fn with_items(
        &self,
        models: Vec<orders::Model>,
    ) -> Result<Vec<OrderWithItems>, StoreError> {
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        if !ids.is_empty() {
            let item_models = order_items::Entity::find()
                .filter(order_items::Column::OrderId.is_in(ids))
                .order_by_asc(order_items::Column::CreatedAt)
                .all(&self.db)
                .await
                .context("load order items")?;
            for item in item_models {
                items_by_order
                    .entry(item.order_id)
                    .or_default()
                    .push(order_item_from_model(item));
            }
        }

        models
            .into_iter()
            .map(|model| {
                let items = items_by_order.remove(&model.id).unwrap_or_default();
                Ok(OrderWithItems {
                    order: order_from_model(model)?,
                    items,
                })
            })
            .collect()
    }
}

impl OrderRepository for DbOrderRepository {
    async fn create(&self, order: &Order, items: &[OrderItem]) -> Result<(), StoreError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let order = order.clone();
                let items = items.to_vec();
                Box::pin(async move {
                    insert_order(txn, &order).await?;
                    for item in &items {
                        insert_order_item(txn, item).await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("create order with items")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        let model = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order by id")?;
        model.map(order_from_model).transpose()
    }

    async fn find_with_items(&self, id: Uuid) -> Result<Option<OrderWithItems>, StoreError> {
        let model = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order by id")?;
        let Some(model) = model else {
            return Ok(None);
        };
        Ok(self.with_items(vec![model]).await?.pop())
    }

    async fn find_for_customer(
        &self,
        id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<OrderWithItems>, StoreError> {
        let model = orders::Entity::find_by_id(id)
            .filter(orders::Column::CustomerId.eq(customer_id))
            .one(&self.db)
            .await
            .context("find customer order")?;
        let Some(model) = model else {
            return Ok(None);
        };
        Ok(self.with_items(vec![model]).await?.pop())
    }

    async fn list_by_customer(
        &self,
        customer_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<OrderWithItems>, StoreError> {
        let mut query = orders::Entity::find()
            .filter(orders::Column::CustomerId.eq(customer_id))
            .order_by_desc(orders::Column::CreatedAt);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let models = query.all(&self.db).await.context("list customer orders")?;
        self.with_items(models).await
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Order>, StoreError> {
        let models = orders::Entity::find()
            .order_by_desc(orders::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent orders")?;
        models.into_iter().map(order_from_model).collect()
    }

    async fn set_preference_id(&self, id: Uuid, preference_id: &str) -> Result<(), StoreError> {
        orders::ActiveModel {
            id: Set(id),
            provider_preference_id: Set(Some(preference_id.to_owned())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set order preference id")?;
        Ok(())
    }

    async fn apply_provider_update(
        &self,
        id: Uuid,
        update: &ProviderPaymentUpdate,
    ) -> Result<Option<Order>, StoreError> {
        let exists = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order for provider update")?
            .is_some();
        if !exists {
            return Ok(None);
        }

        let mut active = orders::ActiveModel {
            id: Set(id),
            provider_payment_id: Set(update.payment_id.clone()),
            provider_status: Set(update.provider_status.clone()),
            provider_status_detail: Set(update.provider_status_detail.clone()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(status) = update.status {
            active.status = Set(status.as_str().to_owned());
        }
        let model = active
            .update(&self.db)
            .await
            .context("apply provider update")?;
        order_from_model(model).map(Some)
    }

    async fn mark_receipt_sent(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        orders::ActiveModel {
            id: Set(id),
            receipt_sent_at: Set(Some(at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark receipt sent")?;
        Ok(())
    }
}

async fn insert_order(txn: &DatabaseTransaction, order: &Order) -> Result<(), sea_orm::DbErr> {
    orders::ActiveModel {
        id: Set(order.id),
        status: Set(order.status.as_str().to_owned()),
        total_cents: Set(order.total_cents),
        currency: Set(order.currency.clone()),
        customer_email: Set(order.customer_email.clone()),
        customer_id: Set(order.customer_id),
        provider: Set(order.provider.clone()),
        provider_preference_id: Set(order.provider_preference_id.clone()),
        provider_payment_id: Set(order.provider_payment_id.clone()),
        provider_status: Set(order.provider_status.clone()),
        provider_status_detail: Set(order.provider_status_detail.clone()),
        receipt_sent_at: Set(order.receipt_sent_at),
        created_at: Set(order.created_at),
        updated_at: Set(order.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_order_item(
    txn: &DatabaseTransaction,
    item: &OrderItem,
) -> Result<(), sea_orm::DbErr> {
    order_items::ActiveModel {
        id: Set(item.id),
        order_id: Set(item.order_id),
        product_id: Set(item.product_id),
        name: Set(item.name.clone()),
        quantity: Set(item.quantity),
        unit_price_cents: Set(item.unit_price_cents),
        created_at: Set(Utc::now()),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn order_from_model(model: orders::Model) -> Result<Order, StoreError> {
    let status = model
        .status
        .parse::<OrderStatus>()
        .with_context(|| format!("order {}", model.id))?;
    Ok(Order {
        id: model.id,
        status,
        total_cents: model.total_cents,
        currency: model.currency,
        customer_email: model.customer_email,
        customer_id: model.customer_id,
        provider: model.provider,
        provider_preference_id: model.provider_preference_id,
        provider_payment_id: model.provider_payment_id,
        provider_status: model.provider_status,
        provider_status_detail: model.provider_status_detail,
        receipt_sent_at: model.receipt_sent_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn order_item_from_model(model: order_items::Model) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        name: model.name,
        quantity: model.quantity,
        unit_price_cents: model.unit_price_cents,
    }
}

// ── Payment hook repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPaymentHookRepository {
    pub db: DatabaseConnection,
}

impl PaymentHookRepository for DbPaymentHookRepository {
    async fn list_active_for_event(&self, event: &str) -> Result<Vec<PaymentHook>, StoreError> {
        let models = payment_hooks::Entity::find()
            .filter(payment_hooks::Column::Active.eq(true))
            .filter(payment_hooks::Column::Event.eq(event))
            .order_by_asc(payment_hooks::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list active hooks for event")?;
        Ok(models.into_iter().map(hook_from_model).collect())
    }

    async fn list_all(&self) -> Result<Vec<PaymentHook>, StoreError> {
        let models = payment_hooks::Entity::find()
            .order_by_desc(payment_hooks::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list hooks")?;
        Ok(models.into_iter().map(hook_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentHook>, StoreError> {
        let model = payment_hooks::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find hook by id")?;
        Ok(model.map(hook_from_model))
    }

    async fn create(&self, hook: &PaymentHook) -> Result<(), StoreError> {
        payment_hooks::ActiveModel {
            id: Set(hook.id),
            name: Set(hook.name.clone()),
            url: Set(hook.url.clone()),
            provider: Set(hook.provider.clone()),
            event: Set(hook.event.clone()),
            active: Set(hook.active),
            created_at: Set(hook.created_at),
            updated_at: Set(hook.created_at),
        }
        .insert(&self.db)
        .await
        .context("create hook")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        // Deliveries go with the hook through ON DELETE CASCADE.
        let result = payment_hooks::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete hook")?;
        Ok(result.rows_affected > 0)
    }

    async fn record_delivery(&self, delivery: &HookDelivery) -> Result<(), StoreError> {
        payment_hook_deliveries::ActiveModel {
            id: Set(delivery.id),
            hook_id: Set(delivery.hook_id),
            event: Set(delivery.event.clone()),
            payload: Set(delivery.payload.clone()),
            status_code: Set(delivery.status_code),
            error: Set(delivery.error.clone()),
            created_at: Set(delivery.created_at),
        }
        .insert(&self.db)
        .await
        .context("record hook delivery")?;
        Ok(())
    }

    async fn list_deliveries(
        &self,
        hook_id: Uuid,
        limit: u64,
    ) -> Result<Vec<HookDelivery>, StoreError> {
        let models = payment_hook_deliveries::Entity::find()
            .filter(payment_hook_deliveries::Column::HookId.eq(hook_id))
            .order_by_desc(payment_hook_deliveries::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list hook deliveries")?;
        Ok(models
            .into_iter()
            .map(|m| HookDelivery {
                id: m.id,
                hook_id: m.hook_id,
                event: m.event,
                payload: m.payload,
                status_code: m.status_code,
                error: m.error,
                created_at: m.created_at,
            })
            .collect())
    }
}

fn hook_from_model(model: payment_hooks::Model) -> PaymentHook {
    PaymentHook {
        id: model.id,
        name: model.name,
        url: model.url,
        provider: model.provider,
        event: model.event,
        active: model.active,
        created_at: model.created_at,
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSettingsRepository {
    pub db: DatabaseConnection,
}

impl SettingsRepository for DbSettingsRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let model = app_settings::Entity::find_by_id(key.to_owned())
            .one(&self.db)
            .await
            .context("get setting")?;
        Ok(model.map(|m| m.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        app_settings::Entity::insert(app_settings::ActiveModel {
            key: Set(key.to_owned()),
            value: Set(value.to_owned()),
            updated_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(app_settings::Column::Key)
                .update_columns([app_settings::Column::Value, app_settings::Column::UpdatedAt])
                .to_owned(),
        )
        .exec(&self.db)
        .await
        .context("upsert setting")?;
        Ok(())
    }
}
