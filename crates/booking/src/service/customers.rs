use std::ops::Deref;

use eyre::Result;
use log::info;
use model::customer::{sanitize_phone, Customer};
use model::session::Session;
use storage::customer::CustomerStore;

#[derive(Clone)]
pub struct Customers {
    store: CustomerStore,
}

impl Customers {
    pub(crate) fn new(store: CustomerStore) -> Self {
        Customers { store }
    }

    /// Looks a customer up by sanitized phone, creating one on first contact.
    /// A returning customer gets the submitted contact fields refreshed.
    pub async fn get_or_create(
        &self,
        session: &mut Session,
        name: &str,
        phone: &str,
        email: Option<&str>,
        line_user_id: Option<&str>,
    ) -> Result<Customer> {
        let phone = sanitize_phone(phone);
        if let Some(existing) = self.store.get_by_phone(session, &phone).await? {
            self.store
                .update_contact(session, existing.id, name, email, line_user_id)
                .await?;
            return Ok(Customer {
                name: name.to_owned(),
                email: email.map(str::to_owned).or(existing.email),
                line_user_id: line_user_id.map(str::to_owned).or(existing.line_user_id),
                ..existing
            });
        }

        let customer = Customer::new(
            name.to_owned(),
            &phone,
            email.map(str::to_owned),
            line_user_id.map(str::to_owned),
        );
        info!("New customer: {}", customer.id);
        self.store.insert(session, &customer).await?;
        Ok(customer)
    }
}

impl Deref for Customers {
    type Target = CustomerStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
