//! Client-side payload checks run before a create/update request is built.

use crate::error::ValidationError;
use crate::types::{CreatePost, CreateTask, CreateUser, UpdatePost, UpdateTask, UpdateUser};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;
pub const NAME_MAX_CHARS: usize = 100;

/// A payload that can reject itself before it reaches the network.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

fn email(value: &str) -> Result<(), ValidationError> {
    match value.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(ValidationError::new("email", "must look like name@domain")),
    }
}

impl Validate for CreateTask {
    fn validate(&self) -> Result<(), ValidationError> {
        required("title", &self.title)?;
        max_chars("title", &self.title, TITLE_MAX_CHARS)?;
        if let Some(description) = &self.description {
            max_chars("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        Ok(())
    }
}

impl Validate for UpdateTask {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            required("title", title)?;
            max_chars("title", title, TITLE_MAX_CHARS)?;
        }
        if let Some(description) = &self.description {
            max_chars("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        Ok(())
    }
}

impl Validate for CreatePost {
    fn validate(&self) -> Result<(), ValidationError> {
        required("title", &self.title)?;
        max_chars("title", &self.title, TITLE_MAX_CHARS)?;
        required("content", &self.content)
    }
}

impl Validate for UpdatePost {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            required("title", title)?;
            max_chars("title", title, TITLE_MAX_CHARS)?;
        }
        if let Some(content) = &self.content {
            required("content", content)?;
        }
        Ok(())
    }
}

impl Validate for CreateUser {
    fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name)?;
        max_chars("name", &self.name, NAME_MAX_CHARS)?;
        email(&self.email)
    }
}

impl Validate for UpdateUser {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            required("name", name)?;
            max_chars("name", name, NAME_MAX_CHARS)?;
        }
        if let Some(address) = &self.email {
            email(address)?;
        }
        Ok(())
    }
}
