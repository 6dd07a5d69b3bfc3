use crate::loader::Dataset;
use crate::schema::{ConceptRow, PhotoRecord, ProtestRecord};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn open(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    init(&conn)?;
    Ok(conn)
}

pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS protests (
          row_id INTEGER PRIMARY KEY AUTOINCREMENT,
          slug TEXT NOT NULL,
          naam TEXT,
          beschrijving TEXT,
          datum_start TEXT,
          datum_eind TEXT,
          locaties TEXT,
          classificaties TEXT,
          thumbnail TEXT,
          wikidata TEXT,
          extra_informatie TEXT
        );

        CREATE TABLE IF NOT EXISTS photos (
          row_id INTEGER PRIMARY KEY AUTOINCREMENT,
          idx TEXT,
          uri TEXT,
          protest TEXT,
          naam TEXT,
          beschrijving TEXT,
          datum_start TEXT,
          datum_eind TEXT,
          fotograaf TEXT,
          archief TEXT,
          url TEXT,
          locatie TEXT,
          iiif_info_json TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_protests_slug ON protests(slug);

        CREATE INDEX IF NOT EXISTS idx_photos_protest ON photos(protest);

        CREATE TABLE IF NOT EXISTS concepts (
          row_id INTEGER PRIMARY KEY AUTOINCREMENT,
          pref_label TEXT,
          uri TEXT
        );
        "#,
    )?;
    Ok(())
}

/// Replaces the stored dataset. Row order is kept through insertion order and
/// rows sharing a slug are stored side by side.
pub fn replace_dataset(conn: &mut Connection, dataset: &Dataset) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch("DELETE FROM protests; DELETE FROM photos; DELETE FROM concepts;")?;

    for p in &dataset.protests {
        insert_protest(&tx, p)?;
    }
    for photo in &dataset.photos {
        insert_photo(&tx, photo)?;
    }
    for concept in &dataset.concepts {
        tx.execute(
            "INSERT INTO concepts (pref_label, uri) VALUES (?1, ?2)",
            params![concept.pref_label, concept.uri],
        )?;
    }

    tx.commit()?;
    Ok(())
}

pub fn insert_protest(conn: &Connection, p: &ProtestRecord) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO protests (
          slug, naam, beschrijving, datum_start, datum_eind,
          locaties, classificaties, thumbnail, wikidata, extra_informatie
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
        params![
            p.slug,
            p.name,
            p.description,
            p.start_date,
            p.end_date,
            p.locations,
            p.classifications,
            p.thumbnail,
            p.wikidata,
            p.notes
        ],
    )?;
    Ok(())
}

fn insert_photo(conn: &Connection, photo: &PhotoRecord) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO photos (
          idx, uri, protest, naam, beschrijving, datum_start, datum_eind,
          fotograaf, archief, url, locatie, iiif_info_json
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            photo.index,
            photo.uri,
            photo.protest,
            photo.name,
            photo.description,
            photo.start_date,
            photo.end_date,
            photo.photographer,
            photo.archive,
            photo.url,
            photo.location,
            photo.image_info_url
        ],
    )?;
    Ok(())
}

pub fn load_dataset(conn: &Connection) -> Result<Dataset> {
    let mut stmt = conn.prepare(
        r#"
        SELECT slug, naam, beschrijving, datum_start, datum_eind,
               locaties, classificaties, thumbnail, wikidata, extra_informatie
        FROM protests
        ORDER BY row_id
        "#,
    )?;
    let protests = stmt
        .query_map([], |row| {
            Ok(ProtestRecord {
                slug: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                start_date: row.get(3)?,
                end_date: row.get(4)?,
                locations: row.get(5)?,
                classifications: row.get(6)?,
                thumbnail: row.get(7)?,
                wikidata: row.get(8)?,
                notes: row.get(9)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt = conn.prepare(
        r#"
        SELECT idx, uri, protest, naam, beschrijving, datum_start, datum_eind,
               fotograaf, archief, url, locatie, iiif_info_json
        FROM photos
        ORDER BY row_id
        "#,
    )?;
    let photos = stmt
        .query_map([], |row| {
            Ok(PhotoRecord {
                index: row.get(0)?,
                uri: row.get(1)?,
                protest: row.get(2)?,
                name: row.get(3)?,
                description: row.get(4)?,
                start_date: row.get(5)?,
                end_date: row.get(6)?,
                photographer: row.get(7)?,
                archive: row.get(8)?,
                url: row.get(9)?,
                location: row.get(10)?,
                image_info_url: row.get(11)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt = conn.prepare("SELECT pref_label, uri FROM concepts ORDER BY row_id")?;
    let concepts = stmt
        .query_map([], |row| {
            Ok(ConceptRow {
                pref_label: row.get(0)?,
                uri: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(Dataset {
        protests,
        photos,
        concepts,
    })
}
