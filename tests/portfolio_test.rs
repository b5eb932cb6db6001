// ABOUTME: Integration tests for projects, skills, experience and contact messages
// ABOUTME: Covers publish filtering, view counting, status timestamp stamping, stats
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Utc;
use folio_server::{
    database::{ContactFilter, ContactUpdate, ProjectFilter, ProjectSort, ProjectUpdate, SkillFilter},
    models::{
        Admin, ContactMessage, ContactPriority, ContactStatus, EmploymentType, Experience,
        Project, ProjectCategory, ProjectImage, ProjectStatus, Skill, SkillCategory, SkillStatus,
        WorkType,
    },
    pagination::PageQuery,
};
use uuid::Uuid;

fn sample_project(admin: &Admin, title: &str, status: ProjectStatus) -> Project {
    let now = Utc::now();
    Project {
        id: Uuid::new_v4(),
        title: title.into(),
        description: "A portfolio project".into(),
        long_description: None,
        category: ProjectCategory::WebApp,
        technologies: vec!["Rust".into(), "Axum".into()],
        images: vec![ProjectImage {
            url: "https://img.example/1.png".into(),
            alt: Some("screenshot".into()),
            is_primary: false,
        }],
        live_url: Some("https://example.com".into()),
        github_url: None,
        featured: false,
        status,
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
        created_by: admin.id,
        created_at: now,
        updated_at: now,
    }
}

fn sample_contact(email: &str) -> ContactMessage {
    let now = Utc::now();
    ContactMessage {
        id: Uuid::new_v4(),
        name: "Jane Doe".into(),
        email: email.into(),
        subject: "Project inquiry".into(),
        message: "I would like a website.".into(),
        phone: None,
        company: Some("Acme".into()),
        project_type: Some("Web Development".into()),
        budget: None,
        timeline: None,
        source: "Website".into(),
        status: ContactStatus::New,
        priority: ContactPriority::Medium,
        tags: vec![],
        notes: None,
        ip_address: Some("10.1.2.3".into()),
        user_agent: Some("test-agent".into()),
        read_at: None,
        replied_at: None,
        archived_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_project_crud_and_publish_filter() {
    let database = common::create_test_database().await.unwrap();
    let admin = common::seed_admin(&database, "a@x.com", folio_server::models::AdminRole::Admin)
        .await
        .unwrap();

    database
        .create_project(&sample_project(&admin, "Live one", ProjectStatus::Published))
        .await
        .unwrap();
    database
        .create_project(&sample_project(&admin, "Hidden draft", ProjectStatus::Draft))
        .await
        .unwrap();

    // The public filter sees only published projects
    let (published, total) = database
        .list_projects(
            &ProjectFilter {
                status: Some(ProjectStatus::Published),
                ..ProjectFilter::default()
            },
            ProjectSort::default(),
            PageQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(published[0].title, "Live one");

    // The admin view without a status filter sees both
    let (_, all_total) = database
        .list_projects(
            &ProjectFilter::default(),
            ProjectSort::default(),
            PageQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(all_total, 2);

    // Categories come from published rows only
    let categories = database.published_project_categories().await.unwrap();
    assert_eq!(categories, vec!["Web App".to_owned()]);
}

#[tokio::test]
async fn test_project_view_counter_and_update() {
    let database = common::create_test_database().await.unwrap();
    let admin = common::seed_admin(&database, "a@x.com", folio_server::models::AdminRole::Admin)
        .await
        .unwrap();

    let project = sample_project(&admin, "Counted", ProjectStatus::Published);
    database.create_project(&project).await.unwrap();

    database.increment_project_views(project.id).await.unwrap();
    database.increment_project_views(project.id).await.unwrap();

    let loaded = database.get_project(project.id).await.unwrap().unwrap();
    assert_eq!(loaded.view_count, 2);

    // Partial update touches only the named fields and keeps one primary image
    let updated = database
        .update_project(
            project.id,
            &ProjectUpdate {
                title: Some("Renamed".into()),
                featured: Some(true),
                ..ProjectUpdate::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert!(updated.featured);
    assert_eq!(updated.description, "A portfolio project");
    assert_eq!(updated.images.iter().filter(|i| i.is_primary).count(), 1);

    // Delete reports removal exactly once
    assert!(database.delete_project(project.id).await.unwrap());
    assert!(!database.delete_project(project.id).await.unwrap());
}

#[tokio::test]
async fn test_project_search_and_stats() {
    let database = common::create_test_database().await.unwrap();
    let admin = common::seed_admin(&database, "a@x.com", folio_server::models::AdminRole::Admin)
        .await
        .unwrap();

    let mut featured = sample_project(&admin, "Shop platform", ProjectStatus::Published);
    featured.featured = true;
    database.create_project(&featured).await.unwrap();
    database
        .create_project(&sample_project(&admin, "Blog engine", ProjectStatus::Draft))
        .await
        .unwrap();

    let (found, total) = database
        .list_projects(
            &ProjectFilter {
                search: Some("Shop".into()),
                ..ProjectFilter::default()
            },
            ProjectSort::default(),
            PageQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].title, "Shop platform");

    let stats = database.project_stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.published, 1);
    assert_eq!(stats.draft, 1);
    assert_eq!(stats.featured, 1);
}

#[tokio::test]
async fn test_skill_unique_name_and_filters() {
    let database = common::create_test_database().await.unwrap();
    let admin = common::seed_admin(&database, "a@x.com", folio_server::models::AdminRole::Admin)
        .await
        .unwrap();

    let now = Utc::now();
    let skill = Skill {
        id: Uuid::new_v4(),
        name: "Rust".into(),
        category: SkillCategory::BackendDevelopment,
        proficiency: 92,
        years_of_experience: Some(4.5),
        description: None,
        icon: None,
        color: "#3b82f6".into(),
        featured: true,
        status: SkillStatus::Active,
        certifications: vec![],
        sort_order: 0,
        created_by: admin.id,
        created_at: now,
        updated_at: now,
    };
    database.create_skill(&skill).await.unwrap();

    // Unique index rejects a second "Rust"
    let duplicate = Skill {
        id: Uuid::new_v4(),
        ..skill.clone()
    };
    assert!(database.create_skill(&duplicate).await.is_err());

    let listed = database
        .list_skills(&SkillFilter {
            category: Some(SkillCategory::BackendDevelopment),
            ..SkillFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].proficiency_level(), "Expert");

    let none = database
        .list_skills(&SkillFilter {
            category: Some(SkillCategory::Design),
            ..SkillFilter::default()
        })
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_experience_current_position_clears_end_date() {
    let database = common::create_test_database().await.unwrap();
    let admin = common::seed_admin(&database, "a@x.com", folio_server::models::AdminRole::Admin)
        .await
        .unwrap();

    let now = Utc::now();
    let experience = Experience {
        id: Uuid::new_v4(),
        title: "Engineer".into(),
        company: "Acme".into(),
        location: "Berlin".into(),
        employment_type: EmploymentType::FullTime,
        work_type: WorkType::Remote,
        start_date: now - chrono::Duration::days(400),
        // end_date set although the position is current: the write path drops it
        end_date: Some(now),
        current: true,
        description: "Building things".into(),
        achievements: vec!["Shipped v1".into()],
        responsibilities: vec![],
        technologies: vec!["Rust".into()],
        company_logo: None,
        company_website: None,
        featured: false,
        sort_order: 0,
        created_by: admin.id,
        created_at: now,
        updated_at: now,
    };
    database.create_experience(&experience).await.unwrap();

    let loaded = database
        .get_experience(experience.id)
        .await
        .unwrap()
        .unwrap();
    assert!(loaded.current);
    assert!(loaded.end_date.is_none());
    assert!(loaded.period().ends_with("Present"));

    // Marking it non-current with an end date keeps the date
    let updated = database
        .update_experience(
            experience.id,
            &folio_server::database::ExperienceUpdate {
                current: Some(false),
                end_date: Some(now),
                ..folio_server::database::ExperienceUpdate::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(!updated.current);
    assert!(updated.end_date.is_some());
}

#[tokio::test]
async fn test_contact_status_transitions_stamp_timestamps_once() {
    let database = common::create_test_database().await.unwrap();

    let message = sample_contact("jane@x.com");
    database.create_contact(&message).await.unwrap();

    // New message has no lifecycle timestamps
    let stored = database.get_contact(message.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ContactStatus::New);
    assert!(stored.read_at.is_none());

    // Transition to read stamps read_at
    let read = database
        .update_contact(
            message.id,
            &ContactUpdate {
                status: Some(ContactStatus::Read),
                ..ContactUpdate::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read.status, ContactStatus::Read);
    let first_read_at = read.read_at.unwrap();

    // Replying stamps replied_at and leaves read_at untouched
    let replied = database
        .update_contact(
            message.id,
            &ContactUpdate {
                status: Some(ContactStatus::Replied),
                ..ContactUpdate::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replied.status, ContactStatus::Replied);
    assert!(replied.replied_at.is_some());
    assert_eq!(replied.read_at.unwrap(), first_read_at);

    // Cycling back through read does not overwrite the original stamp
    let reread = database
        .update_contact(
            message.id,
            &ContactUpdate {
                status: Some(ContactStatus::Read),
                ..ContactUpdate::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reread.read_at.unwrap(), first_read_at);
}

#[tokio::test]
async fn test_contact_filters_and_stats() {
    let database = common::create_test_database().await.unwrap();

    for i in 0..3 {
        database
            .create_contact(&sample_contact(&format!("c{i}@x.com")))
            .await
            .unwrap();
    }
    let urgent = ContactMessage {
        priority: ContactPriority::Urgent,
        ..sample_contact("urgent@x.com")
    };
    database.create_contact(&urgent).await.unwrap();

    // Priority filter
    let (urgents, total) = database
        .list_contacts(
            &ContactFilter {
                priority: Some(ContactPriority::Urgent),
                ..ContactFilter::default()
            },
            PageQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(urgents[0].email, "urgent@x.com");

    // Search matches subject/company text
    let (found, total) = database
        .list_contacts(
            &ContactFilter {
                search: Some("Acme".into()),
                ..ContactFilter::default()
            },
            PageQuery::default(),
        )
        .await
        .unwrap();
    assert_eq!(total, 4);
    assert!(!found.is_empty());

    let stats = database.contact_stats().await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.status_counts.get("new"), Some(&4));
    assert_eq!(stats.priority_counts.get("urgent"), Some(&1));
    assert_eq!(database.count_new_contacts().await.unwrap(), 4);
}
