//! 表单状态与本地校验
//!
//! 校验失败的表单永远不会到达网络层。

use crate::error::ConsoleError;
use prodconsole_shared::Product;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// 商品表单的模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Hidden,
    Creating,
    /// 正在编辑的商品 id，编辑期间不可修改
    Editing(i64),
}

impl FormMode {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormMode::Hidden)
    }

    pub fn editing_id(&self) -> Option<i64> {
        match self {
            FormMode::Editing(id) => Some(*id),
            _ => None,
        }
    }
}

/// 所有表单的输入字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Id,
    Title,
    Quantity,
    Name,
    Email,
    Password,
}

/// 商品表单三个输入框的原始文本
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub id: String,
    pub title: String,
    pub quantity: String,
}

impl FormFields {
    /// 用商品当前的值填充
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            quantity: product.quantity.to_string(),
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Id => self.id = value,
            FormField::Title => self.title = value,
            FormField::Quantity => self.quantity = value,
            // 其他字段属于登录/注册表单
            FormField::Name | FormField::Email | FormField::Password => {}
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// 按字段记录的校验错误，显示在对应输入框旁
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<FormField, String>,
}

impl FieldErrors {
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }

    /// 汇总为一个 Validation 错误
    pub fn to_error(&self) -> ConsoleError {
        let summary = self
            .errors
            .values()
            .cloned()
            .collect::<Vec<_>>()
            .join("; ");
        ConsoleError::validation(summary)
    }
}

// =========================================================
// 商品表单校验
// =========================================================

fn parse_integer(
    errors: &mut FieldErrors,
    field: FormField,
    label: &str,
    raw: &str,
) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.insert(field, format!("{} is required", label));
        return None;
    }
    match raw.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.insert(field, format!("{} must be a whole number", label));
            None
        }
    }
}

fn check_title(errors: &mut FieldErrors, raw: &str) -> String {
    let title = raw.trim();
    if title.is_empty() {
        errors.insert(FormField::Title, "Product name is required");
    }
    title.to_string()
}

/// 校验新建商品的输入
pub fn validate_new_product(id: &str, title: &str, quantity: &str) -> Result<Product, FieldErrors> {
    let mut errors = FieldErrors::default();
    let id = parse_integer(&mut errors, FormField::Id, "Product ID", id);
    let title = check_title(&mut errors, title);
    let quantity = parse_integer(&mut errors, FormField::Quantity, "Quantity", quantity);

    errors.into_result(|| Product {
        id: id.unwrap_or_default(),
        title,
        quantity: quantity.unwrap_or_default(),
    })
}

/// 校验更新输入；id 是编辑目标，本身不可修改
pub fn validate_product_update(id: i64, title: &str, quantity: &str) -> Result<Product, FieldErrors> {
    let mut errors = FieldErrors::default();
    let title = check_title(&mut errors, title);
    let quantity = parse_integer(&mut errors, FormField::Quantity, "Quantity", quantity);

    errors.into_result(|| Product {
        id,
        title,
        quantity: quantity.unwrap_or_default(),
    })
}

// =========================================================
// 登录/注册表单校验
// =========================================================

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.insert(FormField::Email, "Email is required");
    } else if !EMAIL_PATTERN.is_match(email) {
        errors.insert(FormField::Email, "Invalid email format");
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.insert(FormField::Password, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            FormField::Password,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_email(&mut errors, email);
    check_password(&mut errors, password);
    errors.into_result(|| ())
}

pub fn validate_register(name: &str, email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if name.trim().is_empty() {
        errors.insert(FormField::Name, "Name is required");
    }
    check_email(&mut errors, email);
    check_password(&mut errors, password);
    errors.into_result(|| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_accepts_valid_input() {
        let product = validate_new_product("5", "  Widget ", "3").unwrap();
        assert_eq!(
            product,
            Product {
                id: 5,
                title: "Widget".to_string(),
                quantity: 3
            }
        );
    }

    #[test]
    fn new_product_reports_every_bad_field() {
        let errors = validate_new_product("", "   ", "lots").unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(FormField::Id), Some("Product ID is required"));
        assert_eq!(errors.get(FormField::Title), Some("Product name is required"));
        assert_eq!(
            errors.get(FormField::Quantity),
            Some("Quantity must be a whole number")
        );
        assert!(errors.to_error().is_validation());
    }

    #[test]
    fn update_ignores_id_text() {
        let product = validate_product_update(9, "Lamp", "0").unwrap();
        assert_eq!(product.id, 9);

        let errors = validate_product_update(9, "Lamp", "").unwrap_err();
        assert_eq!(errors.get(FormField::Quantity), Some("Quantity is required"));
        assert_eq!(errors.get(FormField::Id), None);
    }

    #[test]
    fn login_validation_matches_form_rules() {
        assert!(validate_login("a@b.com", "secret1").is_ok());

        let errors = validate_login("a@b", "12345").unwrap_err();
        assert_eq!(errors.get(FormField::Email), Some("Invalid email format"));
        assert_eq!(
            errors.get(FormField::Password),
            Some("Password must be at least 6 characters")
        );

        let errors = validate_login("", "").unwrap_err();
        assert_eq!(errors.get(FormField::Email), Some("Email is required"));
        assert_eq!(errors.get(FormField::Password), Some("Password is required"));
    }

    #[test]
    fn register_requires_name() {
        let errors = validate_register("  ", "ada@b.com", "secret1").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FormField::Name), Some("Name is required"));
    }

    #[test]
    fn fields_prefill_from_product() {
        let product = Product {
            id: 1,
            title: "MacBook".to_string(),
            quantity: 10,
        };
        let mut fields = FormFields::from_product(&product);
        assert_eq!(fields.quantity, "10");
        fields.set(FormField::Title, "MacBook Pro".to_string());
        assert_eq!(fields.title, "MacBook Pro");
        fields.clear();
        assert_eq!(fields, FormFields::default());
    }
}
