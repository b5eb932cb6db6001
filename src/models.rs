// ABOUTME: Core data models for principals (admins, users) and portfolio content
// ABOUTME: Derived accessors replace the original schema virtuals; no implicit save hooks
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Data Models
//!
//! Entity types for the two principal collections (admins, users) and the
//! portfolio content collections (projects, skills, experience, contact
//! messages). Admins and users live in independent tables with their own
//! unique email/username constraints; the same email may exist in both.
//!
//! Hashed secrets never appear in serialized representations: the principal
//! structs expose sanitized `*Info` views for API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which principal collection a token or context belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    /// Admin collection
    Admin,
    /// User collection
    User,
}

impl PrincipalKind {
    /// String form used in token claims
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Admin role within the admin collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Regular admin
    Admin,
    /// Super admin with account-management privileges
    SuperAdmin,
}

impl AdminRole {
    /// Database/claims string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            other => Err(anyhow::anyhow!("Unknown admin role: {other}")),
        }
    }
}

/// User role within the user collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular user
    User,
    /// User with admin rights on user-facing features
    Admin,
    /// Moderator
    Moderator,
}

impl UserRole {
    /// Database/claims string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Moderator => "moderator",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            other => Err(anyhow::anyhow!("Unknown user role: {other}")),
        }
    }
}

/// Admin permission set entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Delete,
}

impl Permission {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
        }
    }

    /// Default permission set granted to new admins
    #[must_use]
    pub fn default_set() -> Vec<Self> {
        vec![Self::Read, Self::Write, Self::Delete]
    }
}

impl std::str::FromStr for Permission {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "delete" => Ok(Self::Delete),
            other => Err(anyhow::anyhow!("Unknown permission: {other}")),
        }
    }
}

/// An administrator account
#[derive(Debug, Clone)]
pub struct Admin {
    /// Unique identifier
    pub id: Uuid,
    /// Unique username within the admin collection
    pub username: String,
    /// Unique email within the admin collection (lowercased)
    pub email: String,
    /// Bcrypt password hash. Never serialized.
    pub password_hash: String,
    /// Role (`admin` or `super_admin`)
    pub role: AdminRole,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Active flag; false invalidates all authentication
    pub is_active: bool,
    /// Last successful login (updated only on explicit login)
    pub last_login: Option<DateTime<Utc>>,
    /// Granted permissions
    pub permissions: Vec<Permission>,
    /// Optional profile image URL
    pub profile_image: Option<String>,
    /// Admin who created this account, if any
    pub created_by: Option<Uuid>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    /// Create a new admin with default permissions and active status
    #[must_use]
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        role: AdminRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.trim().to_owned(),
            email: email.trim().to_lowercase(),
            password_hash,
            role,
            first_name: first_name.trim().to_owned(),
            last_name: last_name.trim().to_owned(),
            is_active: true,
            last_login: None,
            permissions: Permission::default_set(),
            profile_image: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name (derived, replaces the schema virtual)
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Sanitized view for API responses
    #[must_use]
    pub fn info(&self) -> AdminInfo {
        AdminInfo {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            full_name: self.full_name(),
            role: self.role,
            is_active: self.is_active,
            permissions: self.permissions.clone(),
            last_login: self.last_login,
            profile_image: self.profile_image.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Sanitized admin representation (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub permissions: Vec<Permission>,
    pub last_login: Option<DateTime<Utc>>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Social profile links for a user account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
}

/// A registered site user
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Unique username within the user collection (lowercased)
    pub username: String,
    /// Unique email within the user collection (lowercased)
    pub email: String,
    /// Bcrypt password hash. Never serialized.
    pub password_hash: String,
    /// Role (`user`, `admin` or `moderator`)
    pub role: UserRole,
    /// Active flag; false invalidates all authentication
    pub is_active: bool,
    /// Last successful login (updated only on explicit login)
    pub last_login: Option<DateTime<Utc>>,
    /// Optional profile picture URL
    pub profile_picture: Option<String>,
    /// Short biography
    pub bio: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Social profile links
    pub social_links: SocialLinks,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user
    #[must_use]
    pub fn new(
        first_name: String,
        last_name: String,
        username: String,
        email: String,
        password_hash: String,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.trim().to_owned(),
            last_name: last_name.trim().to_owned(),
            username: username.trim().to_lowercase(),
            email: email.trim().to_lowercase(),
            password_hash,
            role,
            is_active: true,
            last_login: None,
            profile_picture: None,
            bio: None,
            phone: None,
            social_links: SocialLinks::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name (derived, replaces the schema virtual)
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Sanitized view for API responses
    #[must_use]
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            full_name: self.full_name(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            is_active: self.is_active,
            last_login: self.last_login,
            profile_picture: self.profile_picture.clone(),
            bio: self.bio.clone(),
            phone: self.phone.clone(),
            social_links: self.social_links.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Sanitized user representation (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub social_links: SocialLinks,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectCategory {
    #[serde(rename = "Web App")]
    WebApp,
    #[serde(rename = "Mobile App")]
    MobileApp,
    #[serde(rename = "E-commerce")]
    Ecommerce,
    #[serde(rename = "API")]
    Api,
    #[serde(rename = "Desktop App")]
    DesktopApp,
    #[serde(rename = "Other")]
    Other,
}

impl ProjectCategory {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebApp => "Web App",
            Self::MobileApp => "Mobile App",
            Self::Ecommerce => "E-commerce",
            Self::Api => "API",
            Self::DesktopApp => "Desktop App",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for ProjectCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Web App" => Ok(Self::WebApp),
            "Mobile App" => Ok(Self::MobileApp),
            "E-commerce" => Ok(Self::Ecommerce),
            "API" => Ok(Self::Api),
            "Desktop App" => Ok(Self::DesktopApp),
            "Other" => Ok(Self::Other),
            other => Err(anyhow::anyhow!("Unknown project category: {other}")),
        }
    }
}

/// Publication status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    Published,
    Archived,
}

impl ProjectStatus {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            other => Err(anyhow::anyhow!("Unknown project status: {other}")),
        }
    }
}

/// An image attached to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectImage {
    pub url: String,
    pub alt: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// A portfolio project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub category: ProjectCategory,
    pub technologies: Vec<String>,
    pub images: Vec<ProjectImage>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: bool,
    pub status: ProjectStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub client: Option<String>,
    pub team_size: Option<u32>,
    pub my_role: Option<String>,
    pub challenges: Vec<String>,
    pub solutions: Vec<String>,
    pub results: Vec<String>,
    pub sort_order: i64,
    pub view_count: i64,
    /// Admin who created the project
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Human-readable project duration between start and end dates
    #[must_use]
    pub fn duration(&self) -> Option<String> {
        let (start, end) = (self.start_date?, self.end_date?);
        let days = (end - start).num_days().abs();
        let months = (days as u64).div_ceil(30);
        if months > 1 {
            Some(format!("{months} months"))
        } else {
            Some(format!("{days} days"))
        }
    }

    /// The primary image, falling back to the first one
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProjectImage> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.first())
    }

    /// Enforce the single-primary-image rule before persisting.
    ///
    /// Keeps the first primary if several are flagged; promotes the first
    /// image when none is. Invoked explicitly by the write path.
    pub fn normalize_images(&mut self) {
        if self.images.is_empty() {
            return;
        }
        if let Some(first_primary) = self.images.iter().position(|img| img.is_primary) {
            for (i, img) in self.images.iter_mut().enumerate() {
                img.is_primary = i == first_primary;
            }
        } else {
            self.images[0].is_primary = true;
        }
    }
}

/// Skill category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillCategory {
    #[serde(rename = "Frontend Development")]
    FrontendDevelopment,
    #[serde(rename = "Backend Development")]
    BackendDevelopment,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "Database")]
    Database,
    #[serde(rename = "Cloud & DevOps")]
    CloudDevOps,
    #[serde(rename = "Design")]
    Design,
    #[serde(rename = "Testing")]
    Testing,
    #[serde(rename = "Tools & Others")]
    ToolsOthers,
}

impl SkillCategory {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FrontendDevelopment => "Frontend Development",
            Self::BackendDevelopment => "Backend Development",
            Self::MobileDevelopment => "Mobile Development",
            Self::Database => "Database",
            Self::CloudDevOps => "Cloud & DevOps",
            Self::Design => "Design",
            Self::Testing => "Testing",
            Self::ToolsOthers => "Tools & Others",
        }
    }
}

impl std::str::FromStr for SkillCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Frontend Development" => Ok(Self::FrontendDevelopment),
            "Backend Development" => Ok(Self::BackendDevelopment),
            "Mobile Development" => Ok(Self::MobileDevelopment),
            "Database" => Ok(Self::Database),
            "Cloud & DevOps" => Ok(Self::CloudDevOps),
            "Design" => Ok(Self::Design),
            "Testing" => Ok(Self::Testing),
            "Tools & Others" => Ok(Self::ToolsOthers),
            other => Err(anyhow::anyhow!("Unknown skill category: {other}")),
        }
    }
}

/// Lifecycle status of a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillStatus {
    Active,
    Learning,
    Inactive,
}

impl SkillStatus {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Learning => "learning",
            Self::Inactive => "inactive",
        }
    }
}

impl std::str::FromStr for SkillStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "learning" => Ok(Self::Learning),
            "inactive" => Ok(Self::Inactive),
            other => Err(anyhow::anyhow!("Unknown skill status: {other}")),
        }
    }
}

/// A professional certification attached to a skill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

/// A skill entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    /// Unique skill name
    pub name: String,
    pub category: SkillCategory,
    /// Proficiency percentage, 0..=100
    pub proficiency: u8,
    pub years_of_experience: Option<f64>,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Hex display color
    pub color: String,
    pub featured: bool,
    pub status: SkillStatus,
    pub certifications: Vec<Certification>,
    pub sort_order: i64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Skill {
    /// Named proficiency tier derived from the percentage
    #[must_use]
    pub const fn proficiency_level(&self) -> &'static str {
        match self.proficiency {
            90..=100 => "Expert",
            75..=89 => "Advanced",
            50..=74 => "Intermediate",
            25..=49 => "Beginner",
            _ => "Learning",
        }
    }
}

/// Employment type for an experience entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
    #[serde(rename = "Freelance")]
    Freelance,
    #[serde(rename = "Internship")]
    Internship,
}

impl EmploymentType {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::PartTime => "Part-time",
            Self::Contract => "Contract",
            Self::Freelance => "Freelance",
            Self::Internship => "Internship",
        }
    }
}

impl std::str::FromStr for EmploymentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Full-time" => Ok(Self::FullTime),
            "Part-time" => Ok(Self::PartTime),
            "Contract" => Ok(Self::Contract),
            "Freelance" => Ok(Self::Freelance),
            "Internship" => Ok(Self::Internship),
            other => Err(anyhow::anyhow!("Unknown employment type: {other}")),
        }
    }
}

/// Work arrangement for an experience entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkType {
    #[serde(rename = "On-site")]
    OnSite,
    #[serde(rename = "Remote")]
    Remote,
    #[serde(rename = "Hybrid")]
    Hybrid,
}

impl WorkType {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnSite => "On-site",
            Self::Remote => "Remote",
            Self::Hybrid => "Hybrid",
        }
    }
}

impl std::str::FromStr for WorkType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "On-site" => Ok(Self::OnSite),
            "Remote" => Ok(Self::Remote),
            "Hybrid" => Ok(Self::Hybrid),
            other => Err(anyhow::anyhow!("Unknown work type: {other}")),
        }
    }
}

/// A work-experience entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub work_type: WorkType,
    pub start_date: DateTime<Utc>,
    /// Cleared by the write path when `current` is set
    pub end_date: Option<DateTime<Utc>>,
    pub current: bool,
    pub description: String,
    pub achievements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub technologies: Vec<String>,
    pub company_logo: Option<String>,
    pub company_website: Option<String>,
    pub featured: bool,
    pub sort_order: i64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Experience {
    /// Human-readable duration, running to now for current positions
    #[must_use]
    pub fn duration(&self) -> String {
        let end = self.end_date.unwrap_or_else(Utc::now);
        let days = (end - self.start_date).num_days().abs();
        let total_months = (days as u64).div_ceil(30).max(1);
        let years = total_months / 12;
        let months = total_months % 12;

        match (years, months) {
            (0, m) => format!("{m} month{}", if m > 1 { "s" } else { "" }),
            (y, 0) => format!("{y} year{}", if y > 1 { "s" } else { "" }),
            (y, m) => format!(
                "{y} year{} {m} month{}",
                if y > 1 { "s" } else { "" },
                if m > 1 { "s" } else { "" }
            ),
        }
    }

    /// Display period such as "Jan 2022 - Present"
    #[must_use]
    pub fn period(&self) -> String {
        let start = self.start_date.format("%b %Y");
        match (self.current, self.end_date) {
            (true, _) | (false, None) => format!("{start} - Present"),
            (false, Some(end)) => format!("{start} - {}", end.format("%b %Y")),
        }
    }
}

/// Contact message lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    New,
    Read,
    Replied,
    Archived,
    Spam,
}

impl ContactStatus {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
            Self::Archived => "archived",
            Self::Spam => "spam",
        }
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "read" => Ok(Self::Read),
            "replied" => Ok(Self::Replied),
            "archived" => Ok(Self::Archived),
            "spam" => Ok(Self::Spam),
            other => Err(anyhow::anyhow!("Unknown contact status: {other}")),
        }
    }
}

/// Contact message priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl ContactPriority {
    /// Database string form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl std::str::FromStr for ContactPriority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(anyhow::anyhow!("Unknown contact priority: {other}")),
        }
    }
}

/// An inbound contact-form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Enumerated on the form; stored verbatim
    pub project_type: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub source: String,
    pub status: ContactStatus,
    pub priority: ContactPriority,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    /// Client address; captured for tracking, never serialized to callers
    #[serde(skip_serializing, default)]
    pub ip_address: Option<String>,
    /// Client user agent; captured for tracking, never serialized to callers
    #[serde(skip_serializing, default)]
    pub user_agent: Option<String>,
    pub read_at: Option<DateTime<Utc>>,
    pub replied_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactMessage {
    /// Contact line such as "Jane <jane@x.com> | +155555 | Acme"
    #[must_use]
    pub fn full_contact(&self) -> String {
        let mut contact = format!("{} <{}>", self.name, self.email);
        if let Some(phone) = &self.phone {
            contact.push_str(&format!(" | {phone}"));
        }
        if let Some(company) = &self.company {
            contact.push_str(&format!(" | {company}"));
        }
        contact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_full_name_accessors() {
        let admin = Admin::new(
            "jdoe".into(),
            "J@Example.COM".into(),
            "hash".into(),
            "John".into(),
            "Doe".into(),
            AdminRole::Admin,
        );
        assert_eq!(admin.full_name(), "John Doe");
        // Email is normalized on construction
        assert_eq!(admin.email, "j@example.com");
    }

    #[test]
    fn test_username_lowercased_for_users() {
        let user = User::new(
            "Alice".into(),
            "Smith".into(),
            "AliceS".into(),
            "a@x.com".into(),
            "hash".into(),
            UserRole::User,
        );
        assert_eq!(user.username, "alices");
    }

    #[test]
    fn test_proficiency_levels() {
        let mut skill = Skill {
            id: Uuid::new_v4(),
            name: "Rust".into(),
            category: SkillCategory::BackendDevelopment,
            proficiency: 95,
            years_of_experience: Some(4.0),
            description: None,
            icon: None,
            color: "#3b82f6".into(),
            featured: true,
            status: SkillStatus::Active,
            certifications: vec![],
            sort_order: 0,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(skill.proficiency_level(), "Expert");
        skill.proficiency = 80;
        assert_eq!(skill.proficiency_level(), "Advanced");
        skill.proficiency = 60;
        assert_eq!(skill.proficiency_level(), "Intermediate");
        skill.proficiency = 30;
        assert_eq!(skill.proficiency_level(), "Beginner");
        skill.proficiency = 10;
        assert_eq!(skill.proficiency_level(), "Learning");
    }

    #[test]
    fn test_normalize_images_single_primary() {
        let mk = |primary| ProjectImage {
            url: "u".into(),
            alt: None,
            is_primary: primary,
        };
        let mut project = Project {
            id: Uuid::new_v4(),
            title: "P".into(),
            description: "d".into(),
            long_description: None,
            category: ProjectCategory::WebApp,
            technologies: vec![],
            images: vec![mk(true), mk(true), mk(false)],
            live_url: None,
            github_url: None,
            featured: false,
            status: ProjectStatus::Published,
            start_date: None,
            end_date: None,
            client: None,
            team_size: None,
            my_role: None,
            challenges: vec![],
            solutions: vec![],
            results: vec![],
            sort_order: 0,
            view_count: 0,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        project.normalize_images();
        assert_eq!(
            project.images.iter().filter(|i| i.is_primary).count(),
            1
        );
        assert!(project.images[0].is_primary);

        // No primary flagged: the first image is promoted
        for img in &mut project.images {
            img.is_primary = false;
        }
        project.normalize_images();
        assert!(project.images[0].is_primary);
    }

    #[test]
    fn test_experience_period_display() {
        let start = Utc.with_ymd_and_hms(2022, 1, 15, 0, 0, 0).single().unwrap();
        let end = Utc.with_ymd_and_hms(2023, 6, 30, 0, 0, 0).single().unwrap();
        let exp = Experience {
            id: Uuid::new_v4(),
            title: "Engineer".into(),
            company: "Acme".into(),
            location: "Berlin".into(),
            employment_type: EmploymentType::FullTime,
            work_type: WorkType::Remote,
            start_date: start,
            end_date: Some(end),
            current: false,
            description: "Work".into(),
            achievements: vec![],
            responsibilities: vec![],
            technologies: vec![],
            company_logo: None,
            company_website: None,
            featured: false,
            sort_order: 0,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(exp.period(), "Jan 2022 - Jun 2023");

        let current = Experience {
            current: true,
            end_date: None,
            ..exp
        };
        assert_eq!(current.period(), "Jan 2022 - Present");
    }

    #[test]
    fn test_contact_serialization_hides_tracking_fields() {
        let msg = ContactMessage {
            id: Uuid::new_v4(),
            name: "Jane".into(),
            email: "jane@x.com".into(),
            subject: "Hello".into(),
            message: "Hi".into(),
            phone: None,
            company: None,
            project_type: None,
            budget: None,
            timeline: None,
            source: "Website".into(),
            status: ContactStatus::New,
            priority: ContactPriority::Medium,
            tags: vec![],
            notes: None,
            ip_address: Some("10.0.0.1".into()),
            user_agent: Some("curl".into()),
            read_at: None,
            replied_at: None,
            archived_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("10.0.0.1"));
        assert!(!json.contains("curl"));
        assert!(json.contains("jane@x.com"));
    }
}
